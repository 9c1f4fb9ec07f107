use smsledger_core::Direction;

/// Where a rule gets its merchant from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MerchantCapture {
    /// Read this capture group
    Group(usize),
    /// The phrasing names no counterparty (salary credits etc.); use a placeholder
    Fixed(&'static str),
}

/// One SMS phrasing: a case-insensitive pattern plus which groups hold which field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRule {
    pub name: &'static str,
    pub direction: Direction,
    pub pattern: &'static str,
    pub amount: usize,
    pub currency: Option<usize>,
    pub merchant: MerchantCapture,
}
