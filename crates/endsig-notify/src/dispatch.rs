//! Completion notices for newly finished series.

use std::collections::{BTreeMap, BTreeSet};

use endsig_core::ContentItem;

use crate::error::NotifyError;
use crate::lookup::SubscriberLookup;
use crate::mailer::Mailer;

/// Per-item summary lines plus the number of subscribers actually reached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub lines: Vec<String>,
    pub total_notified: u64,
}

/// Sends one completion notice per subscriber of each id in `newly_finished`,
/// in id order.
///
/// A failed send is logged and not counted; it never stops the remaining
/// sends. An empty `newly_finished` returns immediately without touching the
/// lookup or the mailer.
///
/// # Errors
///
/// Returns [`NotifyError::Configuration`] when there is something to send but
/// `mailer` is `None`, and propagates subscriber lookup failures.
pub async fn dispatch_completions(
    newly_finished: &BTreeSet<String>,
    items: &BTreeMap<String, ContentItem>,
    source: &str,
    lookup: &dyn SubscriberLookup,
    mailer: Option<&dyn Mailer>,
) -> Result<DispatchSummary, NotifyError> {
    if newly_finished.is_empty() {
        return Ok(DispatchSummary::default());
    }
    let Some(mailer) = mailer else {
        return Err(NotifyError::Configuration(format!(
            "{} newly finished item(s) for {source} but no mailer is available",
            newly_finished.len()
        )));
    };

    tracing::info!(source, count = newly_finished.len(), "dispatching completion notices");
    let mut summary = DispatchSummary::default();

    for content_id in newly_finished {
        let title = items
            .get(content_id)
            .map_or_else(|| format!("ID {content_id}"), |item| item.title.clone());
        let subscribers = lookup.subscribers(content_id, source).await?;

        if subscribers.is_empty() {
            summary
                .lines
                .push(format!("- '{title}' (ID:{content_id}) : no subscribers"));
            continue;
        }

        let (subject, body) = completion_message(&title, content_id);
        let mut delivered = 0u64;
        for email in &subscribers {
            match mailer.send(email, &subject, &body).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(source, content_id = %content_id, error = %e, "completion notice not delivered");
                }
            }
        }

        summary.total_notified += delivered;
        summary.lines.push(format!(
            "- '{title}' (ID:{content_id}) : notified {delivered} of {} subscribers",
            subscribers.len()
        ));
    }

    Ok(summary)
}

fn completion_message(title: &str, content_id: &str) -> (String, String) {
    let subject = format!("Completion notice: '{title}' (ID:{content_id}) has finished!");
    let body = format!(
        "Hello from Ending Signal!\n\n\
         The series you subscribed to, '{title}' (ID:{content_id}), has just finished.\n\
         Now is a great time to binge it from the start.\n\n\
         Thank you."
    );
    (subject, body)
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
