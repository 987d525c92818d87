pub mod mint_card;

// Re-export key types for convenience.
pub use mint_card::{MintCardActionButtonsProps, render_mint_card_action_buttons};
