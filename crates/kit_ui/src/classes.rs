/// Join class lists, dropping empty parts and exact repeats.
///
/// Tailwind conflicts are not resolved: `cn([Some("xl:px-0"), Some("xl:px-2")])`
/// keeps both classes and the stylesheet order decides which one applies.
pub fn cn<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for class in parts.into_iter().flatten().flat_map(str::split_whitespace) {
        if !seen.contains(&class) {
            seen.push(class);
        }
    }
    seen.join(" ")
}
