//! The message protocol between clipping surfaces.
//!
//! The original clipper relayed JSON messages between its background,
//! content, and panel contexts. Modeled here as a tagged union over a typed
//! channel: the tag field is `action` and names keep the original wire
//! strings, so a recorded message log from the extension replays against
//! this implementation.
//!
//! Selection is request/response with at-most-one in-flight request per
//! initiating action: starting a new selection cancels the pending one.

use std::sync::mpsc::{Receiver, SendError, Sender, TryRecvError, channel};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ExtractMode;
use crate::store::Store;

/// One protocol message.
///
/// Wire format: `{"action": "<variant>", ...fields}` with camelCase names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Message {
    /// Panel asks the page surface to enter extract-selection mode.
    StartSelectExtract {
        /// The variable the selection is for.
        variable_id: Uuid,
        /// Raw specificity level to generate with (defaults to 1).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        specificity_level: Option<u32>,
    },
    /// Panel asks the page surface to enter paste-selection mode.
    StartSelectPaste {
        /// The variable whose value will be pasted.
        variable_id: Uuid,
    },
    /// Page surface reports the selector generated for a clicked element.
    SelectorSelected {
        /// The generated selector.
        selector: String,
        /// The variable the selection was for.
        variable_id: Uuid,
    },
    /// Page surface reports the paste destination the user clicked.
    PasteTargetSelected {
        /// The generated selector.
        selector: String,
        /// The variable whose value should be pasted.
        variable_id: Uuid,
    },
    /// The pending selection was cancelled (right-click or superseded).
    SelectCancelled,
    /// Ask the page surface to extract a value.
    ExtractValue {
        /// Selector to resolve.
        selector: String,
        /// How to read the value.
        #[serde(rename = "extractType")]
        extract_mode: ExtractMode,
        /// Attribute name for attribute mode.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribute_name: Option<String>,
    },
    /// Extraction response.
    ExtractResult {
        /// The extracted value (`""` when nothing matched).
        value: String,
        /// Where the value came from.
        source_url: String,
    },
    /// Ask the page surface to paste a value.
    PasteValue {
        /// Selector to resolve.
        selector: String,
        /// Value to write.
        value: String,
    },
    /// Paste response, relayed back to the panel.
    PasteComplete {
        /// The variable that was pasted.
        variable_id: Uuid,
        /// Whether the paste changed the document.
        success: bool,
    },
    /// Ask the page surface to count matches for a selector.
    VerifySelector {
        /// Selector to probe.
        selector: String,
    },
    /// Verification response.
    VerifyResult {
        /// Number of elements the selector resolved to.
        count: usize,
    },
    /// Leave selection mode without selecting.
    StopSelect,
}

/// Which kind of selection a pending request initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKind {
    /// Selecting the element to extract from.
    Extract,
    /// Selecting the element to paste into.
    Paste,
}

/// A pending selection request.
#[derive(Debug, Clone, Copy)]
struct PendingSelect {
    kind: SelectKind,
    variable_id: Uuid,
}

/// Message relay between clipping surfaces.
///
/// Owns the receiving end of the channel and the at-most-one-pending
/// selection state; producers get cloned [`Sender`]s.
pub struct Relay {
    sender: Sender<Message>,
    receiver: Receiver<Message>,
    pending: Option<PendingSelect>,
}

impl Relay {
    /// Create a relay with a fresh channel.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Relay {
            sender,
            receiver,
            pending: None,
        }
    }

    /// A sender handle for a surface that wants to post messages.
    #[must_use]
    pub fn sender(&self) -> Sender<Message> {
        self.sender.clone()
    }

    /// Begin a selection request.
    ///
    /// If a selection is already in flight it is superseded: the returned
    /// message is the [`Message::SelectCancelled`] the surfaces should see
    /// for the old request.
    pub fn begin_select(&mut self, kind: SelectKind, variable_id: Uuid) -> Option<Message> {
        let cancelled = self.pending.take().map(|_| Message::SelectCancelled);
        self.pending = Some(PendingSelect { kind, variable_id });
        cancelled
    }

    /// Complete the pending selection with a generated selector.
    ///
    /// Produces the response message matching the pending request's kind,
    /// or `None` when nothing was pending (a stray click).
    pub fn complete_select(&mut self, selector: &str) -> Option<Message> {
        let pending = self.pending.take()?;
        Some(match pending.kind {
            SelectKind::Extract => Message::SelectorSelected {
                selector: selector.to_string(),
                variable_id: pending.variable_id,
            },
            SelectKind::Paste => Message::PasteTargetSelected {
                selector: selector.to_string(),
                variable_id: pending.variable_id,
            },
        })
    }

    /// Cancel the pending selection, if any.
    pub fn cancel_select(&mut self) -> Option<Message> {
        self.pending.take().map(|_| Message::SelectCancelled)
    }

    /// Whether a selection request is in flight.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Post a message onto the channel.
    ///
    /// # Errors
    ///
    /// Returns the message back if the channel is closed.
    pub fn send(&self, message: Message) -> Result<(), SendError<Message>> {
        self.sender.send(message)
    }

    /// Take the next queued message, if any.
    pub fn try_recv(&self) -> Option<Message> {
        match self.receiver.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain all queued messages.
    pub fn drain(&self) -> Vec<Message> {
        let mut messages = Vec::new();
        while let Some(message) = self.try_recv() {
            messages.push(message);
        }
        messages
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a surface-originated message to the store.
///
/// Mirrors what the original panel did on receipt: selection results land
/// in the variable they were requested for. Messages that carry no store
/// state (notifications, requests) leave it untouched.
///
/// Returns whether the store changed.
pub fn apply_message(store: &mut Store, message: &Message) -> bool {
    match message {
        Message::SelectorSelected {
            selector,
            variable_id,
        } => {
            if let Some(variable) = store.variable_mut(*variable_id) {
                variable.selector.clone_from(selector);
                return true;
            }
            false
        }
        Message::PasteTargetSelected {
            selector,
            variable_id,
        } => {
            if let Some(variable) = store.variable_mut(*variable_id) {
                variable.paste_selector = Some(selector.clone());
                return true;
            }
            false
        }
        _ => false,
    }
}
