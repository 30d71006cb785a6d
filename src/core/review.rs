//! Interactive review of one replacement candidate.
//!
//! A small explicit state machine: confirm the change, then settle on a
//! resource id. Driven entirely through the injected [`Console`], so silent
//! runs and tests never touch a terminal.

use anyhow::Result;
use colored::Colorize;

use crate::core::bundle::ResourceBundle;
use crate::core::id_allocator::ResourceIdAllocator;
use crate::prompt::Console;

const HEAVY_RULE: &str =
    "*******************************************************************************";
const LIGHT_RULE: &str =
    "-------------------------------------------------------------------------------";

/// Outcome of reviewing one candidate.
#[derive(Debug, PartialEq, Eq)]
pub enum ReviewOutcome {
    Accepted(String),
    Rejected,
}

enum ReviewState {
    AwaitConfirm,
    OfferExisting(String),
    AwaitId { suggested: String },
    Accepted(String),
    Rejected,
}

/// Run the review loop for one candidate.
///
/// `original` and `new` are the pre-rendered context windows; `existing_id`
/// is a suggestion carried by the record itself (a markup element's own id
/// attribute). Typed-in ids are checked against the bundle and the walker's
/// identifier sets; a declined generated suggestion is recycled so its
/// number is offered again next time.
pub fn review_candidate(
    console: &mut dyn Console,
    original: &str,
    new: &str,
    existing_id: Option<String>,
    bundle: &ResourceBundle,
    allocator: &mut ResourceIdAllocator,
    is_acceptable: &dyn Fn(&str) -> bool,
) -> Result<ReviewOutcome> {
    let mut state = ReviewState::AwaitConfirm;
    loop {
        state = match state {
            ReviewState::AwaitConfirm => {
                console.show(&HEAVY_RULE.dimmed().to_string());
                console.show(original);
                console.show(&LIGHT_RULE.dimmed().to_string());
                console.show(new);
                console.show(&LIGHT_RULE.dimmed().to_string());
                let confirmed = console.prompt_yes_no(
                    "Does this change make sense to you (resourceId can be changed later)? (Y/n): ",
                )?;
                if !confirmed {
                    ReviewState::Rejected
                } else if let Some(id) = existing_id.clone() {
                    ReviewState::OfferExisting(id)
                } else {
                    let suggested = allocator.next(bundle, is_acceptable);
                    ReviewState::AwaitId { suggested }
                }
            }
            ReviewState::OfferExisting(id) => {
                let keep = console.prompt_yes_no(&format!(
                    "An existing id can be used for this resource, do you like it? (Y/n): {}",
                    id
                ))?;
                if keep {
                    ReviewState::Accepted(id)
                } else {
                    let suggested = allocator.next(bundle, is_acceptable);
                    ReviewState::AwaitId { suggested }
                }
            }
            ReviewState::AwaitId { suggested } => {
                let answer = console.prompt_line(&format!(
                    "Enter to accept the suggested resourceId ({}) or input a new one here: ",
                    suggested
                ))?;
                if answer.is_empty() {
                    ReviewState::Accepted(suggested)
                } else if bundle.contains(&answer) || !is_acceptable(&answer) {
                    console.show(&format!(
                        "{}",
                        format!("\"{}\" is already in use.", answer).yellow()
                    ));
                    ReviewState::AwaitId { suggested }
                } else {
                    // the suggestion was not used, keep its number available
                    allocator.recycle(&suggested);
                    ReviewState::Accepted(answer)
                }
            }
            ReviewState::Accepted(id) => return Ok(ReviewOutcome::Accepted(id)),
            ReviewState::Rejected => return Ok(ReviewOutcome::Rejected),
        };
    }
}
