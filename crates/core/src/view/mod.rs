pub mod enrichment;
pub mod panel;

/// Blocking yes/no prompt shown before destructive actions (deleting a
/// favorite, clearing the list).
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

/// The active conversion form — an external collaborator.
///
/// The favorites panel writes a saved conversion into it and triggers its
/// submit flow; the form exposes no return value back to the favorites
/// subsystem.
pub trait ConversionForm {
    /// Copy a saved conversion into the form fields.
    fn fill(&mut self, amount: f64, from_currency: &str, to_currency: &str);

    /// Trigger the form's conversion flow.
    fn submit(&mut self);
}
