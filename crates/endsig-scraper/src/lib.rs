//! Listing clients for external webtoon platforms and the aggregator that
//! turns their paginated views into one classified [`Snapshot`] per source.
//!
//! [`Snapshot`]: endsig_core::Snapshot

pub mod aggregate;
pub mod client;
pub mod error;
pub mod kakaopage;
pub mod naver;
pub mod retry;
pub mod source;

pub use aggregate::fetch_all;
pub use client::ClientSettings;
pub use error::ScraperError;
pub use kakaopage::KakaopageSource;
pub use naver::NaverWebtoonSource;
pub use retry::RetryPolicy;
pub use source::{ListingLimits, ListingPage, ListingSource, ListingView};
