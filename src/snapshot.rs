//! 标准格式快照文件
//!
//! 每次转换把源 Mod 导出的标准路径点集合落盘一份 YAML，作为审计记录，
//! 路径为 `<data 根目录>/<世界类型>/<mod 名>_<世界名>.yaml`。
//! 每次转换整体重写，不做增量修改

use crate::schema::NeutralWaypointSet;
use crate::worlds::WorldType;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// 单个世界的标准格式快照文件
pub struct StandardWorldWaypoints {
    pub world_name: String,
    pub world_type: WorldType,
    pub mod_name: String,
    path: PathBuf,
}

impl StandardWorldWaypoints {
    pub fn new(data_root: &Path, world_name: &str, world_type: WorldType, mod_name: &str) -> Self {
        let path = data_root
            .join(world_type.as_str())
            .join(format!("{}_{}.yaml", mod_name, world_name));
        Self {
            world_name: world_name.to_string(),
            world_type,
            mod_name: mod_name.to_string(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_waypoints(&self) -> Result<NeutralWaypointSet> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("无法读取快照文件: {}", self.path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("快照文件格式不正确: {}", self.path.display()))
    }

    pub fn write_waypoints(&self, set: &NeutralWaypointSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(set)?;
        fs::write(&self.path, content)
            .with_context(|| format!("无法写入快照文件: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Coordinates, Dimension, NeutralWaypoint};

    #[test]
    fn path_follows_convention() {
        let snapshot = StandardWorldWaypoints::new(
            Path::new("data"),
            "BestWorld",
            WorldType::Singleplayer,
            "lunar client",
        );
        assert_eq!(
            snapshot.path(),
            Path::new("data/singleplayer/lunar client_BestWorld.yaml")
        );
    }

    #[test]
    fn write_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = StandardWorldWaypoints::new(
            dir.path(),
            "Hypixel",
            WorldType::Multiplayer,
            "xaero's minimap",
        );

        let mut set = NeutralWaypointSet::new();
        set.insert(
            Dimension::Overworld,
            "spawn".to_string(),
            NeutralWaypoint {
                coordinates: Coordinates { x: 0.0, y: 64.0, z: 0.0 },
                color: 255,
                visible: true,
            },
        );
        snapshot.write_waypoints(&set).unwrap();
        assert_eq!(snapshot.read_waypoints().unwrap(), set);
    }
}
