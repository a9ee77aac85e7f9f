use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::queries;
use crate::models::{
    Conversation, ConversationMessage, ConversationSlots, DialogueState, SearchResultSet, SlotKey,
};
use crate::services::ai::Message;
use crate::services::intent;
use crate::services::search::{self, SearchOutcome, SearchRequest};
use crate::state::AppState;

const NARRATIVE_PROMPT: &str = "You are a luxury travel concierge. Given a guest's request and \
the matching inventory as JSON, write a short, warm reply (2-3 sentences) presenting the best \
options by name and price. Do not invent inventory that is not in the JSON.";

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    /// Slot the dialogue is waiting on, when the search was not dispatched.
    pub awaiting: Option<String>,
    pub results: Option<SearchResultSet>,
}

pub async fn process_message(
    state: &Arc<AppState>,
    session_id: &str,
    message: &str,
) -> anyhow::Result<ChatReply> {
    let mut conv = {
        let db = state.db.lock().unwrap();
        queries::get_conversation(&db, session_id)?
    }
    .unwrap_or_else(|| new_conversation(session_id));

    conv.messages.push(ConversationMessage {
        role: "user".to_string(),
        content: message.to_string(),
    });

    let filter = intent::extract(message, Utc::now().date_naive());

    tracing::info!(
        session = session_id,
        service = ?filter.service,
        state = conv.state.as_str(),
        "processing message"
    );

    // Switching to a different service abandons the old request entirely.
    let mut slots = match filter.service {
        Some(service) if conv.slots.service != Some(service) => {
            conv.slots.clone().with_service(service)
        }
        _ => conv.slots.clone(),
    }
    .merged(&filter);

    // While a slot is awaited, an unstructured message is the answer to it.
    if filter.is_empty() {
        if let Some(awaited) = awaited_slot(&conv.state) {
            slots = fill_from_answer(slots, awaited, message);
        }
    }

    // Direct-intent bypass: service plus destination in one message skips
    // the remaining questions.
    let direct_intent = filter.service.is_some() && filter.to.is_some();
    let ready = slots.service.is_some() && (slots.is_complete() || direct_intent);

    let (reply, awaiting, results) = if ready {
        let request = SearchRequest {
            categories: slots.service.map(|s| vec![s]),
            passengers: slots.passengers,
            location: slots.to.clone(),
            from_location: slots.from.clone(),
            date_from: filter.date_from,
            date_to: filter.date_to,
            query: None,
        };

        // Dispatch exactly once, then reset so stale slots cannot leak
        // into the next request.
        let outcome = search::search_all(state.catalog.as_ref(), &request, state.config.search_limit).await;

        let reply = if outcome.results.total_count == 0 {
            file_custom_request(state, session_id, &slots)?
        } else {
            narrate(state, &conv.messages, &outcome).await
        };

        conv.slots = ConversationSlots::default();
        conv.state = DialogueState::Idle;
        (reply, None, Some(outcome.results))
    } else if slots.service.is_none() {
        conv.slots = slots;
        conv.state = DialogueState::Idle;
        let reply = "I can arrange a private jet, helicopter, yacht, luxury car, an empty leg \
                     deal, or an adventure package. What are you looking for?"
            .to_string();
        (reply, None, None)
    } else {
        let missing = slots
            .next_missing()
            .expect("incomplete slots must have a missing key");
        conv.slots = slots;
        conv.state = missing.collecting_state();
        (missing.prompt().to_string(), Some(missing.as_str().to_string()), None)
    };

    conv.messages.push(ConversationMessage {
        role: "assistant".to_string(),
        content: reply.clone(),
    });

    let now = Utc::now().naive_utc();
    conv.last_activity = now;
    conv.expires_at = now + Duration::minutes(30);

    {
        let db = state.db.lock().unwrap();
        queries::save_conversation(&db, &conv)?;
        let _ = queries::expire_old_conversations(&db);
    }

    Ok(ChatReply {
        reply,
        awaiting,
        results,
    })
}

fn new_conversation(session_id: &str) -> Conversation {
    let now = Utc::now().naive_utc();
    Conversation {
        session_id: session_id.to_string(),
        messages: vec![],
        state: DialogueState::Idle,
        slots: ConversationSlots::default(),
        last_activity: now,
        expires_at: now + Duration::minutes(30),
    }
}

fn awaited_slot(state: &DialogueState) -> Option<SlotKey> {
    match state {
        DialogueState::CollectingFrom => Some(SlotKey::From),
        DialogueState::CollectingTo => Some(SlotKey::To),
        DialogueState::CollectingPassengers => Some(SlotKey::Passengers),
        _ => None,
    }
}

fn fill_from_answer(slots: ConversationSlots, awaited: SlotKey, message: &str) -> ConversationSlots {
    match awaited {
        SlotKey::From | SlotKey::To => match intent::normalize_location(message) {
            Some(location) => slots.with_slot(awaited, &location),
            None => slots,
        },
        SlotKey::Passengers => {
            match message
                .split_whitespace()
                .find_map(|w| w.parse::<i64>().ok())
            {
                Some(n) => slots.with_slot(SlotKey::Passengers, &n.to_string()),
                None => slots,
            }
        }
    }
}

/// Zero results: capture the request for manual follow-up instead of
/// dead-ending the guest.
fn file_custom_request(
    state: &Arc<AppState>,
    session_id: &str,
    slots: &ConversationSlots,
) -> anyhow::Result<String> {
    let id = Uuid::new_v4().to_string();
    let details = serde_json::to_string(slots)?;
    {
        let db = state.db.lock().unwrap();
        queries::create_custom_request(&db, &id, session_id, &details)?;
    }
    tracing::info!(session = session_id, request = %id, "filed custom request");

    Ok(
        "I couldn't find an exact match for that, so I've passed your request to our team — \
         they'll put together a custom itinerary and get back to you shortly."
            .to_string(),
    )
}

async fn narrate(
    state: &Arc<AppState>,
    history: &[ConversationMessage],
    outcome: &SearchOutcome,
) -> String {
    let fallback = summarize(outcome);

    let Some(llm) = &state.llm else {
        return fallback;
    };

    let context = match serde_json::to_string(&outcome.results) {
        Ok(json) => json,
        Err(_) => return fallback,
    };

    let mut messages: Vec<Message> = history
        .iter()
        .map(|m| Message {
            role: m.role.clone(),
            content: m.content.clone(),
        })
        .collect();
    messages.push(Message {
        role: "user".to_string(),
        content: format!("Matching inventory:\n{context}"),
    });

    match llm.chat(NARRATIVE_PROMPT, &messages).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "narrative generation failed, using plain summary");
            fallback
        }
    }
}

fn summarize(outcome: &SearchOutcome) -> String {
    let mut parts: Vec<String> = vec![];
    for (category, records) in &outcome.results.by_category {
        if records.is_empty() {
            continue;
        }
        let top = &records[0];
        let price = top
            .price
            .map(|p| format!(" from {} {:.0}", top.currency, p))
            .unwrap_or_default();
        parts.push(format!(
            "{} {}{} (top pick: {}{price})",
            records.len(),
            category.label(),
            if records.len() == 1 { "" } else { "s" },
            top.title,
        ));
    }

    format!(
        "I found {} option{} for you: {}.",
        outcome.results.total_count,
        if outcome.results.total_count == 1 { "" } else { "s" },
        parts.join("; ")
    )
}
