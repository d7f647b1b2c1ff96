//! User-facing message text and media rendering.
//!
//! All conversation wording lives here so the engine reads as control
//! flow and the texts stay greppable.

use once_cell::sync::Lazy;

use crate::domain::history::HistoryRecord;
use crate::domain::search::Listing;
use crate::ports::MediaItem;

/// Exact confirmation input that launches the search.
pub const CONFIRM_TEXT: &str = "Start search";

/// Selection payload of the "show more" continuation.
pub const PAYLOAD_MORE_RESULTS: &str = "more_results";

/// Button label of the "show more" continuation.
pub const LABEL_SHOW_MORE: &str = "Show more";

/// Prefix of history-replay selection payloads.
pub const PAYLOAD_HISTORY_PREFIX: &str = "history:";

pub const MSG_GREETING: &str = "Hi! Send /help to see the available commands";
pub const MSG_CANCELLED: &str = "Command cancelled";
pub const MSG_NO_ACTIVE_FLOW: &str =
    "Send a command to start a search. /help lists the commands";
pub const MSG_FLOW_IN_PROGRESS: &str =
    "A search is already in progress. Finish it or send /cancel first";
pub const MSG_WRONG_STATE: &str = "Press the button or type the expected value";
pub const MSG_NOTHING_FOUND: &str = "Nothing was found for your request, send a new command";
pub const MSG_END_OF_LIST: &str = "End of list, send a new command";
pub const MSG_NO_HISTORY: &str = "You have not made any searches yet";
pub const MSG_HISTORY_GONE: &str = "That history entry no longer exists";
pub const MSG_PICK_DATE: &str = "Use the calendar to pick a date";
pub const MSG_CHOOSE_CURRENCY: &str = "Choose one of the offered currencies";

pub const PROMPT_CITY: &str = "Enter the city to search in";
pub const PROMPT_ENTER_DATE: &str = "Pick a check-in date";
pub const PROMPT_EXIT_DATE: &str = "Pick a check-out date";
pub const PROMPT_ADULTS: &str = "Enter the number of adults (13 or older)";
pub const PROMPT_CHILDREN: &str = "Enter the number of children (2 to 13 years old)";
pub const PROMPT_INFANTS: &str = "Enter the number of infants (under 2)";
pub const PROMPT_PETS: &str = "Enter the number of pets";
pub const PROMPT_CURRENCY: &str = "Choose a currency";
pub const PROMPT_MAX_PRICE: &str = "Enter the maximum price";
pub const PROMPT_CONFIRM: &str = "To start the search press:\nStart search";

/// The user-visible command list, in /help order.
pub const COMMAND_DESCRIPTIONS: [(&str, &str); 7] = [
    ("/help", "show this help"),
    ("/bestdeals", "best rated stays"),
    ("/lowprice", "cheapest stays"),
    ("/highprice", "most expensive stays"),
    ("/history", "your previous searches"),
    ("/custom", "search with your own price ceiling"),
    ("/cancel", "cancel the current command"),
];

static HELP_TEXT: Lazy<String> = Lazy::new(|| {
    COMMAND_DESCRIPTIONS
        .iter()
        .map(|(command, description)| format!("{command} - {description}"))
        .collect::<Vec<_>>()
        .join("\n")
});

/// One line per command, built once.
pub fn help_text() -> &'static str {
    &HELP_TEXT
}

/// Continuation notice shown between batches.
pub fn more_results_text(remaining: usize) -> String {
    format!("{remaining} more results available.\nSend /cancel to start a new search")
}

/// Caption of one listing: name, beds, address, price, rating, link.
pub fn listing_caption(listing: &Listing) -> String {
    format!(
        "Name: {}\nBeds: {}\nAddress: {}\nPrice: {} {}\nRating: {}\nLink: {}",
        listing.name,
        listing.bed_count,
        listing.address,
        listing.price.amount,
        listing.price.currency,
        listing.rating_or_default(),
        listing.detail_link,
    )
}

/// Renders a listing as one media+description unit, capped at the first
/// three photos.
pub fn media_item(listing: &Listing) -> MediaItem {
    MediaItem {
        image_links: listing.image_links.iter().take(3).cloned().collect(),
        caption: listing_caption(listing),
    }
}

/// Short label for a history-replay option button.
pub fn history_label(record: &HistoryRecord) -> String {
    format!(
        "{} {} - {}",
        record.city, record.enter_date, record.exit_date
    )
}

/// Full history text, oldest first, entries separated by a rule.
pub fn history_text(records: &[HistoryRecord]) -> String {
    let splitter = "-".repeat(10);
    records
        .iter()
        .map(|record| {
            format!(
                "Searched at: {}\nCity: {}\nCheck-in: {}\nCheck-out: {}\nAdults: {}\n{}",
                record.searched_at,
                record.city,
                record.enter_date,
                record.exit_date,
                record.adult_count,
                splitter,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
