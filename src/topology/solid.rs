use super::shell::ShellId;

slotmap::new_key_type! {
    /// Unique identifier for a solid in the topology store.
    pub struct SolidId;
}

/// Data associated with a sheet solid.
///
/// Sheet-metal solids are represented by their tracked surface: one shell
/// whose faces form the sheet's reference surface. Material thickness is
/// configuration, not geometry.
#[derive(Debug, Clone)]
pub struct SolidData {
    /// The tracked-surface shell of the sheet.
    pub shell: ShellId,
}
