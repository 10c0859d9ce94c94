//! Wholesale price visibility gating.
//!
//! Wholesale prices are commercially sensitive: they are shown only to
//! signed-in users whose reseller document has been verified. [`decide`]
//! is the pure three-way policy; [`render`] layers the display contract on
//! top (prompt copy, opt-out, amount formatting).
//!
//! There is no error path here. Every identity shape maps to exactly one
//! outcome, and an identity that is present but malformed degrades to the
//! more restrictive "unverified" state.

use rust_decimal::Decimal;

use greengrocer_core::{Identity, format_amount};

/// The three-way visibility decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Anonymous: ask the user to sign in.
    PromptSignIn,
    /// Signed in, document check pending: ask the user to verify.
    PromptVerify,
    /// Signed in and verified: show the price.
    Reveal,
}

/// Decide whether wholesale prices may be shown.
///
/// Evaluated in priority order, first match wins:
///
/// | identity present | verified | decision       |
/// |------------------|----------|----------------|
/// | no               | -        | `PromptSignIn` |
/// | yes              | no       | `PromptVerify` |
/// | yes              | yes      | `Reveal`       |
#[must_use]
pub fn decide(identity: Option<&Identity>) -> Visibility {
    match identity {
        None => Visibility::PromptSignIn,
        Some(identity) if !identity.is_authenticated() => Visibility::PromptSignIn,
        Some(identity) if !identity.is_verified() => Visibility::PromptVerify,
        Some(_) => Visibility::Reveal,
    }
}

/// Render input for one price display.
#[derive(Debug, Clone)]
pub struct PriceTag {
    /// Our wholesale price. Missing renders as zero.
    pub amount: Option<Decimal>,
    /// Optional comparison ("was") price, struck through when shown.
    pub compare_at: Option<Decimal>,
    /// When false, the prompt states render nothing instead of sign-in /
    /// verification copy.
    pub show_prompts: bool,
}

impl PriceTag {
    /// A tag that shows prompts, with no comparison price.
    #[must_use]
    pub const fn new(amount: Option<Decimal>) -> Self {
        Self {
            amount,
            compare_at: None,
            show_prompts: true,
        }
    }

    /// Attach a comparison price.
    #[must_use]
    pub const fn with_compare_at(mut self, compare_at: Option<Decimal>) -> Self {
        self.compare_at = compare_at;
        self
    }

    /// Suppress the prompt states.
    #[must_use]
    pub const fn without_prompts(mut self) -> Self {
        self.show_prompts = false;
        self
    }
}

/// What a view should display for one price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceView {
    /// Show the sign-in prompt; no amount.
    SignInPrompt,
    /// Show the verification-pending prompt; no amount.
    VerifyPrompt,
    /// Show nothing (prompts opted out, reveal not permitted).
    Hidden,
    /// Show the formatted price.
    Price {
        /// Primary amount, e.g. `$ 12.50`.
        display: String,
        /// Struck-through comparison amount in the same format, when present.
        compare_at: Option<String>,
    },
}

/// Apply the visibility policy to one price display.
///
/// `currency_symbol` comes from configuration; this function never
/// computes it. When prompts are opted out, absence of `Reveal` renders
/// nothing - an unverified identity is never silently revealed.
#[must_use]
pub fn render(tag: &PriceTag, identity: Option<&Identity>, currency_symbol: &str) -> PriceView {
    match decide(identity) {
        Visibility::PromptSignIn if tag.show_prompts => PriceView::SignInPrompt,
        Visibility::PromptVerify if tag.show_prompts => PriceView::VerifyPrompt,
        Visibility::PromptSignIn | Visibility::PromptVerify => PriceView::Hidden,
        Visibility::Reveal => PriceView::Price {
            display: format_amount(currency_symbol, tag.amount),
            compare_at: tag
                .compare_at
                .map(|amount| format_amount(currency_symbol, Some(amount))),
        },
    }
}
