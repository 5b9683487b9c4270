//! Completion notices and the consolidated admin report.
//!
//! Delivery goes through the [`Mailer`] capability; subscriber lookup goes
//! through [`SubscriberLookup`]. Both are traits so dispatch can be driven by
//! in-memory fakes.

pub mod admin_report;
pub mod dispatch;
pub mod error;
pub mod lookup;
pub mod mailer;
pub mod sendgrid;
pub mod smtp;

pub use admin_report::{render_admin_report, send_admin_report, AdminReport, ReportFlush};
pub use dispatch::{dispatch_completions, DispatchSummary};
pub use error::NotifyError;
pub use lookup::SubscriberLookup;
pub use mailer::{mailer_from_config, Mailer};
pub use sendgrid::SendGridMailer;
pub use smtp::SmtpMailer;
