use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kit_ui::components::mint_card::*;

fn counting_props(nft_transfered: bool) -> (MintCardActionButtonsProps, Arc<AtomicUsize>) {
    let clicks = Arc::new(AtomicUsize::new(0));
    let counter = clicks.clone();
    let props = MintCardActionButtonsProps::new(nft_transfered, move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (props, clicks)
}

fn render(props: &MintCardActionButtonsProps) -> String {
    render_mint_card_action_buttons(props).into_string()
}

#[test]
fn not_transferred_shows_collect_button() {
    let (props, _) = counting_props(false);
    let html = render(&props);

    assert!(html.contains(
        r#"<button class="btn btn-primary w-full p-2 radius mb-4 xl:mb-4">Collect NFT</button>"#
    ));
    assert!(!html.contains("Build with Account Kit"));
    assert!(!html.contains(DASHBOARD_URL));
}

#[test]
fn collect_dispatches_action() {
    let (props, clicks) = counting_props(false);
    assert!(props.collect_nft());
    assert!(props.collect_nft());
    assert_eq!(clicks.load(Ordering::SeqCst), 2);
}

#[test]
fn disabled_button_is_marked_and_ignores_collect() {
    let (props, clicks) = counting_props(false);
    let props = props.disabled(true);

    assert!(render(&props).contains(r#"xl:mb-4" disabled>Collect NFT</button>"#));
    assert!(!props.collect_nft());
    assert_eq!(clicks.load(Ordering::SeqCst), 0);
}

#[test]
fn transferred_shows_dashboard_link() {
    let (props, clicks) = counting_props(true);
    let html = render(&props);

    assert!(!html.contains("<button"));
    assert!(html.contains(&format!(
        r#"<div><a href="{DASHBOARD_URL}" class="btn btn-primary flex text-center mb-4 p-2 w-full m-auto" target="_blank" rel="noreferrer">Build with Account Kit</a></div>"#
    )));

    // No button, nothing to press.
    assert!(!props.collect_nft());
    assert_eq!(clicks.load(Ordering::SeqCst), 0);
}

#[test]
fn docs_link_and_hint_in_both_states() {
    for transferred in [false, true] {
        let (props, _) = counting_props(transferred);
        let html = render(&props);

        assert!(html.contains(&format!(r#"<a href="{DOCS_URL}" class="#)));
        assert!(html.contains(r#"target="_blank" rel="noreferrer">View docs</a>"#));
        assert!(html.ends_with(
            r#"<p class="text-sm text-fg-secondary text-center md:hidden">Visit desktop site to customize styles and auth methods</p></div>"#
        ));
    }
}

#[test]
fn caller_values_are_escaped() {
    let (props, _) = counting_props(false);
    let props = props
        .id(r#"x"><script>alert(1)</script>"#)
        .title("<script>")
        .class_name(r#"" onmouseover="alert(1)"#);
    let html = render(&props);

    assert!(!html.contains("<script>"), "{html}");
    assert!(!html.contains(r#"" onmouseover"#), "{html}");
    assert!(html.contains("&lt;script&gt;"));
}
