//! Domain events raised by cart mutations.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartEvent {
    Added { id: String, quantity: u32 },
    QuantityChanged { id: String, quantity: u32 },
    Removed { id: String },
    Cleared,
}
