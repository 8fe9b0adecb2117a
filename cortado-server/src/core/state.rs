use std::sync::Arc;

use shared::models::{Area, CafeTable};

use crate::core::Config;
use crate::orders::OrderStorage;
use crate::orders::storage::StorageResult;

/// 服务器状态 - 持有配置与存储的共享引用
///
/// 所有处理器通过 `ServerState` 获取存储句柄，再按需构造生命周期组件
/// （TableRegistry、OrderManager 等）。组件本身只是存储句柄的浅包装，
/// 构造成本可以忽略。
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub storage: OrderStorage,
}

impl ServerState {
    /// 打开存储并在首次启动时预置区域与桌台
    pub fn initialize(config: &Config) -> anyhow::Result<Self> {
        let storage = OrderStorage::open(config.db_path())?;
        seed_default_layout(&storage)?;
        tracing::info!(db_path = %config.db_path().display(), "storage ready");
        Ok(Self {
            config: Arc::new(config.clone()),
            storage,
        })
    }

}

/// 首次启动预置：区域 A/B/C/D + “Mang về”（外卖），每区若干桌台。
/// 区域与桌台的运营管理不属于本服务，预置只为让空库立即可用。
fn seed_default_layout(storage: &OrderStorage) -> StorageResult<()> {
    if !storage.list_areas()?.is_empty() {
        return Ok(());
    }

    let areas = [
        ("area-a", "Khu A", 1, 4),
        ("area-b", "Khu B", 2, 4),
        ("area-c", "Khu C", 3, 4),
        ("area-d", "Khu D", 4, 4),
        ("area-takeaway", "Mang về", 5, 2),
    ];

    for (area_id, name, sort, table_count) in areas {
        storage.put_area(&Area {
            id: area_id.to_string(),
            name: name.to_string(),
            sort,
        })?;
        let prefix = match area_id {
            "area-takeaway" => "M".to_string(),
            _ => name.trim_start_matches("Khu ").to_string(),
        };
        for n in 1..=table_count {
            let table_name = format!("{prefix}{n}");
            storage.put_table(&CafeTable::new(
                format!("table-{}", table_name.to_lowercase()),
                area_id,
                table_name,
            ))?;
        }
    }

    tracing::info!("seeded default areas and tables");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeding_runs_once() {
        let storage = OrderStorage::open_in_memory().unwrap();
        seed_default_layout(&storage).unwrap();
        assert_eq!(storage.list_areas().unwrap().len(), 5);
        assert_eq!(storage.list_tables(Some("area-a")).unwrap().len(), 4);
        assert_eq!(storage.list_tables(Some("area-takeaway")).unwrap().len(), 2);

        // Second run must not duplicate or reset anything.
        seed_default_layout(&storage).unwrap();
        assert_eq!(storage.list_areas().unwrap().len(), 5);
    }
}
