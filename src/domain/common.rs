use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Short label for a record in logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// A record held by an entity store.
///
/// Records are created from a draft (the record's fields without an id) once a
/// repository has assigned the identifier.
pub trait Record: Identifiable + Displayable + Clone + Send + Sync + 'static {
    type Draft: Clone + Send + Sync + 'static;

    /// Singular label used in messages and logs, e.g. `Category`.
    const KIND: &'static str;

    fn from_draft(id: Uuid, draft: Self::Draft) -> Self;
}
