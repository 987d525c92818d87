//! Action buttons under the NFT mint card.
//!
//! Before the NFT has been transferred the card offers a "Collect NFT"
//! button; afterwards it links out to the dashboard instead. The docs link
//! and the desktop hint are shown in both states.

use std::sync::Arc;

use maud::{Markup, html};

use crate::classes::cn;

pub const DASHBOARD_URL: &str = "https://dashboard.alchemy.com/";
pub const DOCS_URL: &str = "https://accountkit.alchemy.com/react/quickstart";

const CONTAINER_CLASS: &str = "md:px-6 xl:px-0";
const COLLECT_CLASS: &str = "btn btn-primary w-full p-2 radius mb-4 xl:mb-4";
const BUILD_CLASS: &str = "btn btn-primary flex text-center mb-4 p-2 w-full m-auto";
const DOCS_CLASS: &str = "btn-secondary btn md:bg-transparent md:btn-link md:w-auto text-sm \
                          font-semibold flex justify-center mb-6 md:mb-0";
const HINT_CLASS: &str = "text-sm text-fg-secondary text-center md:hidden";

/// Callback fired when "Collect NFT" is pressed.
pub type CollectHandler = Arc<dyn Fn() + Send + Sync>;

pub struct MintCardActionButtonsProps {
    pub nft_transfered: bool,
    pub handle_collect_nft: CollectHandler,
    pub disabled: bool,
    /// Merged after the container's own classes.
    pub class_name: Option<String>,
    pub id: Option<String>,
    pub title: Option<String>,
}

impl MintCardActionButtonsProps {
    pub fn new(nft_transfered: bool, on_collect: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            nft_transfered,
            handle_collect_nft: Arc::new(on_collect),
            disabled: false,
            class_name: None,
            id: None,
            title: None,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Press "Collect NFT". Ignored while the button is disabled or not
    /// rendered. Returns whether the handler ran.
    pub fn collect_nft(&self) -> bool {
        if self.nft_transfered || self.disabled {
            return false;
        }
        (self.handle_collect_nft)();
        true
    }
}

pub fn render_mint_card_action_buttons(props: &MintCardActionButtonsProps) -> Markup {
    html! {
        div
            id=[props.id.as_deref()]
            title=[props.title.as_deref()]
            class=(cn([Some(CONTAINER_CLASS), props.class_name.as_deref()]))
        {
            @if props.nft_transfered {
                div {
                    a href=(DASHBOARD_URL) class=(BUILD_CLASS) target="_blank" rel="noreferrer" {
                        "Build with Account Kit"
                    }
                }
            } @else {
                button class=(COLLECT_CLASS) disabled[props.disabled] {
                    "Collect NFT"
                }
            }
            a href=(DOCS_URL) class=(DOCS_CLASS) target="_blank" rel="noreferrer" {
                "View docs"
            }
            p class=(HINT_CLASS) {
                "Visit desktop site to customize styles and auth methods"
            }
        }
    }
}
