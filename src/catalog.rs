// ABOUTME: Source table catalog and the operator's selection set
// ABOUTME: Selection is recomputed from the checked set on every change

/// Tables discovered on the source, in server order, plus the current
/// selection. The selection is always a subset of the catalog and is stored
/// in catalog order so the dispatched table sequence is deterministic.
#[derive(Debug, Default)]
pub struct TableCatalog {
    tables: Vec<String>,
    selected: Vec<String>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|t| t == name)
    }

    /// Replaces the catalog wholesale. Selections referencing tables no
    /// longer present are dropped.
    pub fn replace(&mut self, tables: Vec<String>) {
        let checked: Vec<String> = std::mem::take(&mut self.selected);
        self.tables = tables;
        self.set_checked(&checked);
    }

    pub fn select_all(&mut self) {
        self.selected = self.tables.clone();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn toggle(&mut self, name: &str) {
        let mut checked: Vec<String> = self.selected.clone();
        if let Some(pos) = checked.iter().position(|t| t == name) {
            checked.remove(pos);
        } else {
            checked.push(name.to_string());
        }
        self.set_checked(&checked);
    }

    /// Recomputes the selection as exactly the checked entries still present
    /// in the catalog. Every selection change funnels through here.
    pub fn set_checked(&mut self, checked: &[String]) {
        self.selected = self
            .tables
            .iter()
            .filter(|t| checked.contains(t))
            .cloned()
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> TableCatalog {
        let mut cat = TableCatalog::new();
        cat.replace(vec![
            "t1".to_string(),
            "t2".to_string(),
            "t3".to_string(),
            "t4".to_string(),
        ]);
        cat
    }

    #[test]
    fn selection_recomputation_is_idempotent() {
        let mut cat = catalog();
        cat.select_all();
        cat.deselect_all();
        cat.toggle("t1");
        cat.toggle("t3");
        assert_eq!(cat.selected(), ["t1".to_string(), "t3".to_string()]);
    }

    #[test]
    fn select_all_and_deselect_all_are_idempotent() {
        let mut cat = catalog();
        cat.select_all();
        cat.select_all();
        assert_eq!(cat.selected().len(), 4);
        cat.deselect_all();
        cat.deselect_all();
        assert!(cat.selected().is_empty());
    }

    #[test]
    fn toggle_unchecks_a_checked_table() {
        let mut cat = catalog();
        cat.toggle("t2");
        assert!(cat.is_selected("t2"));
        cat.toggle("t2");
        assert!(!cat.is_selected("t2"));
    }

    #[test]
    fn replace_drops_stale_selections() {
        let mut cat = catalog();
        cat.select_all();
        cat.replace(vec!["t2".to_string(), "t5".to_string()]);
        assert_eq!(cat.selected(), ["t2".to_string()]);
    }

    #[test]
    fn selection_keeps_catalog_order() {
        let mut cat = catalog();
        cat.toggle("t4");
        cat.toggle("t1");
        assert_eq!(cat.selected(), ["t1".to_string(), "t4".to_string()]);
    }

    #[test]
    fn set_checked_ignores_unknown_tables() {
        let mut cat = catalog();
        cat.set_checked(&["t3".to_string(), "ghost".to_string()]);
        assert_eq!(cat.selected(), ["t3".to_string()]);
    }
}
