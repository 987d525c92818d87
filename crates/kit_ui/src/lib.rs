pub mod classes;
pub mod components;

pub use classes::cn;
pub use components::{MintCardActionButtonsProps, render_mint_card_action_buttons};
