//! Lunar Client 路径点适配器（单一 JSON 文件）
//!
//! Lunar Client 把所有世界的路径点存在一个 JSON 文件里，默认路径
//! `~/.lunarclient/settings/game/waypoints.json`，格式如下：
//!
//! ```json
//! {
//!     "version": 1,
//!     "waypoints": {
//!         "sp:worldName 或 mp:serverName": {
//!             "": {
//!                 "waypointName": {
//!                     "location": { "x": 0.0, "y": 64.0, "z": 0.0 },
//!                     "visible": true,
//!                     "dimension": 0,
//!                     "color": { "value": 255 },
//!                     "showBeam": true,
//!                     "showText": true
//!                 }
//!             }
//!         }
//!     }
//! }
//! ```
//!
//! 世界标签 `sp:` 表示单人存档，`mp:` 表示多人服务器。
//! 中间那层 `""` 键是固定包装，直接穿透到路径点表。
//! Lunar Client 不允许同一世界内出现重名路径点

use crate::backup;
use crate::schema::{Coordinates, Dimension, NeutralWaypoint, NeutralWaypointSet};
use crate::worlds::{self, WorldType};
use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value as JsonValue};
use std::fs;
use std::path::{Path, PathBuf};

pub const MOD_NAME: &str = "lunar client";

pub struct LunarAdapter {
    waypoints_file: PathBuf,
    minecraft_dir: PathBuf,
    /// 整个路径点文件的内存副本，写出时整体重写
    document: JsonValue,
}

impl LunarAdapter {
    /// 读取路径点文件并构造适配器
    pub fn new(waypoints_file: PathBuf, minecraft_dir: PathBuf) -> Result<Self> {
        let content = fs::read_to_string(&waypoints_file).with_context(|| {
            format!(
                "无法读取 Lunar Client 路径点文件: {}",
                waypoints_file.display()
            )
        })?;
        let document: JsonValue = serde_json::from_str(&content).with_context(|| {
            format!("Lunar Client 路径点文件不是有效的 JSON: {}", waypoints_file.display())
        })?;
        if document.get("waypoints").and_then(JsonValue::as_object).is_none() {
            bail!(
                "Lunar Client 路径点文件缺少 waypoints 字段: {}",
                waypoints_file.display()
            );
        }
        Ok(Self {
            waypoints_file,
            minecraft_dir,
            document,
        })
    }

    /// 从世界标签解析出通用的世界名
    ///
    /// 本地条目形如 `sp:NAME` / `mp:NAME`；来自存档或服务器列表的
    /// 候选没有前缀，原样返回
    pub fn parse_world_name(world_name: &str) -> &str {
        world_name
            .strip_prefix("sp:")
            .or_else(|| world_name.strip_prefix("mp:"))
            .unwrap_or(world_name)
    }

    /// 世界标签对应的世界类型
    ///
    /// 未见过 Realms 在 Lunar 中的写法，只区分单人/多人
    pub fn world_type(world_name: &str) -> WorldType {
        if world_name.starts_with("sp:") {
            WorldType::Singleplayer
        } else {
            WorldType::Multiplayer
        }
    }

    /// 候选世界列表：已有路径点的世界 + 单人存档 + 服务器列表
    pub fn list_worlds(&self) -> Vec<String> {
        let mut candidates: Vec<String> = self
            .waypoint_map()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        candidates.extend(worlds::singleplayer_saves(&self.minecraft_dir));
        match worlds::multiplayer_servers(&self.minecraft_dir) {
            Ok(servers) => candidates.extend(servers),
            Err(e) => eprintln!("警告: 无法读取服务器列表: {:#}", e),
        }
        candidates
    }

    fn waypoint_map(&self) -> Option<&Map<String, JsonValue>> {
        self.document.get("waypoints")?.as_object()
    }

    /// 穿透 `""` 包装，取出指定世界的路径点表
    fn world_entry(&self, world_name: &str) -> Option<&Map<String, JsonValue>> {
        self.waypoint_map()?.get(world_name)?.get("")?.as_object()
    }

    /// 指定世界的原生路径点表
    pub fn world_waypoints(&self, world_name: &str) -> Result<&Map<String, JsonValue>> {
        self.world_entry(world_name)
            .with_context(|| format!("Lunar Client 中不存在世界 \"{}\"", world_name))
    }

    /// 读取指定世界并转换为标准格式
    ///
    /// 无法解析的路径点记录跳过并告警；未知维度进入占位桶，写出时被丢弃
    pub fn to_neutral(&self, world_name: &str) -> Result<NeutralWaypointSet> {
        let waypoints = self.world_waypoints(world_name)?;
        let mut set = NeutralWaypointSet::new();
        for (name, record) in waypoints {
            match record_to_neutral(record) {
                Some((dimension, waypoint)) => set.insert(dimension, name.clone(), waypoint),
                None => eprintln!("警告: 跳过无法解析的 Lunar 路径点 \"{}\"", name),
            }
        }
        Ok(set)
    }

    /// 把标准格式的路径点合并进指定世界并重写整个文件
    ///
    /// 目标世界中已有的名称跳过不覆盖，防止重复转换时产生重复条目。
    /// Lunar 的路径点表不分维度，重名检查按整个世界
    pub fn from_neutral(&mut self, set: &NeutralWaypointSet, world_name: &str) -> Result<()> {
        // 目标世界可能还没有任何 Lunar 条目，从空表开始
        let mut merged = self.world_entry(world_name).cloned().unwrap_or_default();

        let mut added = 0usize;
        let mut skipped = 0usize;
        for (dimension, waypoints) in set.known_dimensions() {
            for (name, waypoint) in waypoints {
                if merged.contains_key(name) {
                    println!("路径点 \"{}\" 已存在，跳过", name);
                    skipped += 1;
                    continue;
                }
                merged.insert(name.clone(), neutral_to_record(waypoint, dimension));
                added += 1;
            }
        }

        let waypoint_map = self
            .document
            .get_mut("waypoints")
            .and_then(JsonValue::as_object_mut)
            .context("Lunar Client 路径点文件缺少 waypoints 字段")?;
        waypoint_map.insert(world_name.to_string(), json!({ "": merged }));

        let output = serde_json::to_string_pretty(&self.document)?;
        fs::write(&self.waypoints_file, output).with_context(|| {
            format!(
                "无法写入 Lunar Client 路径点文件: {}",
                self.waypoints_file.display()
            )
        })?;
        println!("已写入 {} 个路径点（跳过 {} 个重名）", added, skipped);
        Ok(())
    }

    /// 把整个路径点文件复制到备份目录
    pub fn backup(&self, _world_name: &str, dest_root: &Path) -> Result<()> {
        backup::backup_file(&self.waypoints_file, &dest_root.join("waypoints.json"))
    }
}

/// 解析单条 Lunar 原生记录
///
/// 颜色对象整体缺失时取 0；其余必要字段缺失视为坏记录
fn record_to_neutral(record: &JsonValue) -> Option<(Dimension, NeutralWaypoint)> {
    let location = record.get("location")?;
    let x = location.get("x")?.as_f64()?;
    let y = location.get("y")?.as_f64()?;
    let z = location.get("z")?.as_f64()?;
    let visible = record.get("visible")?.as_bool()?;
    let dimension = Dimension::from_index(record.get("dimension")?.as_i64()?);
    let color = record
        .get("color")
        .and_then(|color| color.get("value"))
        .and_then(JsonValue::as_i64)
        .unwrap_or(0);
    Some((
        dimension,
        NeutralWaypoint {
            coordinates: Coordinates { x, y, z },
            color,
            visible,
        },
    ))
}

/// 由标准格式构造 Lunar 原生记录
///
/// showBeam / showText 是 Lunar 专属字段，标准格式中不存在，
/// 固定为 true 以保证转换结果可见
fn neutral_to_record(waypoint: &NeutralWaypoint, dimension: Dimension) -> JsonValue {
    json!({
        "location": {
            "x": waypoint.coordinates.x,
            "y": waypoint.coordinates.y,
            "z": waypoint.coordinates.z,
        },
        "visible": waypoint.visible,
        "dimension": dimension.index(),
        "color": { "value": waypoint.color },
        "showBeam": true,
        "showText": true,
    })
}
