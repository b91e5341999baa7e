pub mod approvals_scraper;
pub mod filing_feed;
pub mod quote_stream;

pub use approvals_scraper::ApprovalsScraper;
pub use filing_feed::FilingFeed;
pub use quote_stream::QuoteStream;
