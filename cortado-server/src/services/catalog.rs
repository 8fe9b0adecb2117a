//! Catalog service - read-only menu access
//!
//! The lifecycle core consumes the catalog, it never mutates it. Items
//! carry their own `sort` key; listings are ordered by `(sort, name)` the
//! way the registers display them.

use shared::models::{MenuGroup, MenuItem};

use crate::orders::storage::{OrderStorage, StorageResult};

#[derive(Clone)]
pub struct CatalogService {
    storage: OrderStorage,
}

impl CatalogService {
    pub fn new(storage: OrderStorage) -> Self {
        Self { storage }
    }

    /// Menu groups ordered by sort key
    pub fn list_groups(&self) -> StorageResult<Vec<MenuGroup>> {
        let mut groups = self.storage.list_menu_groups()?;
        groups.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.name.cmp(&b.name)));
        Ok(groups)
    }

    /// Active items, optionally restricted to one group
    pub fn list_active_items(&self, group_id: Option<&str>) -> StorageResult<Vec<MenuItem>> {
        let mut items: Vec<MenuItem> = self
            .storage
            .list_menu_items()?
            .into_iter()
            .filter(|i| i.is_active)
            .filter(|i| group_id.is_none_or(|g| i.group_id == g))
            .collect();
        items.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    /// Look up a single item (active or not; callers decide)
    pub fn get_item(&self, item_id: &str) -> StorageResult<Option<MenuItem>> {
        self.storage.get_menu_item(item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, group: &str, name: &str, price: i64, active: bool, sort: i32) -> MenuItem {
        MenuItem {
            id: id.into(),
            group_id: group.into(),
            name: name.into(),
            price,
            is_active: active,
            sort,
        }
    }

    fn service() -> CatalogService {
        let storage = OrderStorage::open_in_memory().unwrap();
        storage
            .put_menu_group(&MenuGroup { id: "g-coffee".into(), name: "Cà phê".into(), sort: 1 })
            .unwrap();
        storage
            .put_menu_group(&MenuGroup { id: "g-tea".into(), name: "Trà".into(), sort: 2 })
            .unwrap();
        storage.put_menu_item(&item("i-2", "g-coffee", "Bạc xỉu", 30000, true, 2)).unwrap();
        storage.put_menu_item(&item("i-1", "g-coffee", "Cà phê đen", 20000, true, 1)).unwrap();
        storage.put_menu_item(&item("i-3", "g-coffee", "Cà phê cũ", 15000, false, 3)).unwrap();
        storage.put_menu_item(&item("i-4", "g-tea", "Trà đá", 5000, true, 1)).unwrap();
        CatalogService::new(storage)
    }

    #[test]
    fn groups_are_sorted() {
        let catalog = service();
        let groups = catalog.list_groups().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, "g-coffee");
    }

    #[test]
    fn inactive_items_are_hidden() {
        let catalog = service();
        let items = catalog.list_active_items(None).unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.is_active));
    }

    #[test]
    fn group_filter_and_sort_order() {
        let catalog = service();
        let items = catalog.list_active_items(Some("g-coffee")).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Cà phê đen");
        assert_eq!(items[1].name, "Bạc xỉu");
    }

    #[test]
    fn get_item_returns_inactive_too() {
        let catalog = service();
        let item = catalog.get_item("i-3").unwrap().unwrap();
        assert!(!item.is_active);
        assert!(catalog.get_item("i-404").unwrap().is_none());
    }
}
