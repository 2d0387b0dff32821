//! Snapshot -> item cache mapping.

use crate::model::todo::{is_blank_title, CreatedAt, TodoItem};
use crate::store::{
    DocumentSnapshot, FieldValue, Snapshot, FIELD_COMPLETED, FIELD_CREATED_AT, FIELD_TITLE,
};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reasons a remote document cannot be shown as an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentMappingError {
    EmptyId,
    MissingField(&'static str),
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    BlankTitle,
}

impl Display for DocumentMappingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "document id is empty"),
            Self::MissingField(field) => write!(f, "missing field `{field}`"),
            Self::WrongType { field, expected } => {
                write!(f, "field `{field}` must be {expected}")
            }
            Self::BlankTitle => write!(f, "field `{FIELD_TITLE}` is blank"),
        }
    }
}

impl Error for DocumentMappingError {}

/// Item list built from one notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotCache {
    /// Sequence number of the notification this cache came from.
    pub version: u64,
    /// Items in store-delivered order.
    pub items: Vec<TodoItem>,
    /// Documents dropped because they could not be mapped.
    pub skipped: usize,
    pub has_pending_writes: bool,
}

impl SnapshotCache {
    /// Maps every document of `snapshot`; malformed documents are skipped.
    pub fn from_snapshot(version: u64, snapshot: &Snapshot) -> Self {
        let mut items = Vec::with_capacity(snapshot.documents.len());
        let mut skipped = 0;

        for document in &snapshot.documents {
            match map_document(document) {
                Ok(item) => items.push(item),
                Err(err) => {
                    skipped += 1;
                    warn!(
                        "event=document_skipped module=sync status=error version={} id={} reason={}",
                        version, document.id, err
                    );
                }
            }
        }

        Self {
            version,
            items,
            skipped,
            has_pending_writes: snapshot.has_pending_writes,
        }
    }
}

/// Combines a document's fields with its store-assigned id.
///
/// - `title`: required non-blank string.
/// - `completed`: boolean; missing or null means `false`.
/// - `createdAt`: timestamp -> `Resolved`, sentinel or null -> `Pending`,
///   missing -> `Absent`.
pub fn map_document(document: &DocumentSnapshot) -> Result<TodoItem, DocumentMappingError> {
    if document.id.is_empty() {
        return Err(DocumentMappingError::EmptyId);
    }

    let title = match document.get(FIELD_TITLE) {
        Some(FieldValue::String(value)) => value.clone(),
        Some(_) => {
            return Err(DocumentMappingError::WrongType {
                field: FIELD_TITLE,
                expected: "a string",
            })
        }
        None => return Err(DocumentMappingError::MissingField(FIELD_TITLE)),
    };
    if is_blank_title(&title) {
        return Err(DocumentMappingError::BlankTitle);
    }

    let completed = match document.get(FIELD_COMPLETED) {
        Some(FieldValue::Bool(value)) => *value,
        Some(FieldValue::Null) | None => false,
        Some(_) => {
            return Err(DocumentMappingError::WrongType {
                field: FIELD_COMPLETED,
                expected: "a boolean",
            })
        }
    };

    let created_at = match document.get(FIELD_CREATED_AT) {
        Some(FieldValue::Timestamp(ms)) => CreatedAt::Resolved(*ms),
        Some(FieldValue::ServerTimestamp) | Some(FieldValue::Null) => CreatedAt::Pending,
        None => CreatedAt::Absent,
        Some(_) => {
            return Err(DocumentMappingError::WrongType {
                field: FIELD_CREATED_AT,
                expected: "a timestamp",
            })
        }
    };

    Ok(TodoItem {
        id: document.id.clone(),
        title,
        completed,
        created_at,
    })
}
