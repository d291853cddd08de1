use lammpstrj::engine::config::{ColumnLayout, DuplicatePolicy};

pub struct DefaultsConfig {
    pub separator: char,
    pub duplicate_ids: DuplicatePolicy,
    pub column_layout: ColumnLayout,
    pub stride: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            separator: ' ',
            duplicate_ids: DuplicatePolicy::Permissive,
            column_layout: ColumnLayout::Fixed,
            stride: 1,
        }
    }
}
