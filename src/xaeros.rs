//! Xaero's Minimap 路径点适配器（按维度划分的文本文件目录）
//!
//! Xaero's Minimap 在一个目录下为每个世界/服务器建一个子目录，
//! 默认根目录 `%APPDATA%/.minecraft/XaeroWaypoints`。世界目录下按维度
//! 再分 `dim%0`、`dim%-1`、`dim%1` 子目录，每个维度目录里是一个
//! `mw$default_1.txt`，按行存路径点：
//!
//! ```text
//! sets:gui.xaero_default:01 Portals
//! #
//! #waypoint:name:initials:x:y:z:color:disabled:type:set:rotate_on_tp:tp_yaw:visibility_type:destination
//! #
//! waypoint:gold farm portal:G:-295:91:158:3:false:0:01 Portals:false:0:0:false
//! waypoint:village home:V:-381:68:1070:0:false:0:gui.xaero_default:false:0:0:false
//! ```
//!
//! `sets:` 开头的分组行和 `#` 开头的注释行是头部元数据，
//! 重写文件时必须原样保留。
//! 世界目录名：单人存档直接用存档名，多人为 `Multiplayer_NAME`，
//! Realms 为 `Realms_NAME`

use crate::backup;
use crate::schema::{Coordinates, Dimension, NeutralWaypoint, NeutralWaypointSet};
use crate::worlds::{self, WorldType};
use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const MOD_NAME: &str = "xaero's minimap";

/// 每个维度目录中的固定文件名
pub const WAYPOINT_FILE_NAME: &str = "mw$default_1.txt";

static DIM_DIR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^dim%(-?\d+)$").unwrap());

/// 一条 Xaero's 原生路径点记录（一行 14 个冒号分隔的字段，
/// 首字段固定为 `waypoint` 关键字）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XaerosWaypoint {
    pub name: String,
    pub initials: String,
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub color: i64,
    pub disabled: bool,
    pub waypoint_type: i64,
    pub set: String,
    pub rotate_on_tp: bool,
    pub tp_yaw: i64,
    pub visibility_type: i64,
    pub destination: bool,
}

impl XaerosWaypoint {
    /// 解析一行记录，字段数不对或数值解析失败返回 `None`
    pub fn parse_line(line: &str) -> Option<XaerosWaypoint> {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() != 14 || fields[0] != "waypoint" {
            return None;
        }
        Some(XaerosWaypoint {
            name: fields[1].to_string(),
            initials: fields[2].to_string(),
            x: fields[3].parse().ok()?,
            y: fields[4].parse().ok()?,
            z: fields[5].parse().ok()?,
            color: fields[6].parse().ok()?,
            disabled: parse_bool(fields[7])?,
            waypoint_type: fields[8].parse().ok()?,
            set: fields[9].to_string(),
            rotate_on_tp: parse_bool(fields[10])?,
            tp_yaw: fields[11].parse().ok()?,
            visibility_type: fields[12].parse().ok()?,
            destination: parse_bool(fields[13])?,
        })
    }

    /// 按文件格式输出一行记录
    pub fn format_line(&self) -> String {
        format!(
            "waypoint:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}:{}",
            self.name,
            self.initials,
            self.x,
            self.y,
            self.z,
            self.color,
            self.disabled,
            self.waypoint_type,
            self.set,
            self.rotate_on_tp,
            self.tp_yaw,
            self.visibility_type,
            self.destination,
        )
    }

    /// 由标准格式构造原生记录
    ///
    /// 坐标向零截断为整数；Mod 专属字段填 Xaero's 的默认值，
    /// 缩写取名称首字符的大写
    pub fn from_neutral(name: &str, waypoint: &NeutralWaypoint) -> XaerosWaypoint {
        let initials = name
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default();
        XaerosWaypoint {
            name: name.to_string(),
            initials,
            x: waypoint.coordinates.x as i64,
            y: waypoint.coordinates.y as i64,
            z: waypoint.coordinates.z as i64,
            color: waypoint.color,
            disabled: !waypoint.visible,
            waypoint_type: 0,
            set: "gui.xaero_default".to_string(),
            rotate_on_tp: false,
            tp_yaw: 0,
            visibility_type: 0,
            destination: false,
        }
    }

    /// 转换到标准格式，disabled 取反为 visible
    pub fn to_neutral(&self) -> NeutralWaypoint {
        NeutralWaypoint {
            coordinates: Coordinates {
                x: self.x as f64,
                y: self.y as f64,
                z: self.z as f64,
            },
            color: self.color,
            visible: !self.disabled,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// 维度目录名 → 维度，目录名不符合 `dim%<整数>` 返回 `None`
fn dimension_from_dir(dir_name: &str) -> Option<Dimension> {
    let caps = DIM_DIR_RE.captures(dir_name)?;
    let index: i64 = caps.get(1)?.as_str().parse().ok()?;
    Some(Dimension::from_index(index))
}

/// 维度 → 目录名（只有已知维度会被写出）
fn dimension_dir_name(dimension: Dimension) -> String {
    format!("dim%{}", dimension.index())
}

pub struct XaerosAdapter {
    base_dir: PathBuf,
    minecraft_dir: PathBuf,
}

impl XaerosAdapter {
    /// 构造适配器
    ///
    /// 根目录允许不存在：作为转换目标时按需创建
    pub fn new(base_dir: PathBuf, minecraft_dir: PathBuf) -> Self {
        Self {
            base_dir,
            minecraft_dir,
        }
    }

    /// 从目录名解析出通用的世界名
    pub fn parse_world_name(world_name: &str) -> &str {
        world_name
            .strip_prefix("Multiplayer_")
            .or_else(|| world_name.strip_prefix("Realms_"))
            .unwrap_or(world_name)
    }

    /// 目录名对应的世界类型，无前缀视为单人存档
    pub fn world_type(world_name: &str) -> WorldType {
        if world_name.starts_with("Multiplayer_") {
            WorldType::Multiplayer
        } else if world_name.starts_with("Realms_") {
            WorldType::Realms
        } else {
            WorldType::Singleplayer
        }
    }

    /// 候选世界列表：已有路径点的世界目录 + 单人存档 + 服务器列表
    pub fn list_worlds(&self) -> Vec<String> {
        let mut candidates: Vec<String> = match fs::read_dir(&self.base_dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_dir())
                .filter_map(|entry| entry.file_name().into_string().ok())
                .collect(),
            Err(_) => Vec::new(),
        };
        candidates.extend(worlds::singleplayer_saves(&self.minecraft_dir));
        match worlds::multiplayer_servers(&self.minecraft_dir) {
            Ok(servers) => candidates.extend(servers),
            Err(e) => eprintln!("警告: 无法读取服务器列表: {:#}", e),
        }
        candidates
    }

    fn world_dir(&self, world_name: &str) -> PathBuf {
        self.base_dir.join(world_name)
    }

    /// 读取指定世界的全部原生记录，按维度分组
    ///
    /// 无法解析的行跳过并告警；不是 `dim%<整数>` 的子目录归入占位维度
    pub fn world_waypoints(&self, world_name: &str) -> Result<Vec<(Dimension, Vec<XaerosWaypoint>)>> {
        let world_dir = self.world_dir(world_name);
        if !world_dir.is_dir() {
            bail!("Xaero's Minimap 中不存在世界 \"{}\"", world_name);
        }

        let mut out = Vec::new();
        for entry in fs::read_dir(&world_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            let dimension = match dimension_from_dir(&dir_name) {
                Some(dimension) => dimension,
                None => {
                    eprintln!("警告: 目录 {} 不是有效的维度目录", dir_name);
                    Dimension::Filler
                }
            };

            let file = path.join(WAYPOINT_FILE_NAME);
            if !file.exists() {
                continue;
            }
            let content = fs::read_to_string(&file)
                .with_context(|| format!("无法读取 {}", file.display()))?;

            let mut records = Vec::new();
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with("sets") || line.starts_with('#') {
                    continue;
                }
                match XaerosWaypoint::parse_line(line) {
                    Some(record) => records.push(record),
                    None => eprintln!("警告: 跳过无法解析的行: {}", line),
                }
            }
            out.push((dimension, records));
        }
        Ok(out)
    }

    /// 读取指定世界并转换为标准格式
    pub fn to_neutral(&self, world_name: &str) -> Result<NeutralWaypointSet> {
        let mut set = NeutralWaypointSet::new();
        for (dimension, records) in self.world_waypoints(world_name)? {
            for record in records {
                let neutral = record.to_neutral();
                set.insert(dimension, record.name, neutral);
            }
        }
        Ok(set)
    }

    /// 把标准格式的路径点合并进指定世界
    ///
    /// 对每个有新路径点的维度：原文件的所有行（头部元数据和已有记录）
    /// 逐字保留，新路径点各追加一行，然后整体重写该文件。
    /// 同维度内已有的名称跳过不覆盖，防止重复转换时产生重复条目
    pub fn from_neutral(&self, set: &NeutralWaypointSet, world_name: &str) -> Result<()> {
        let world_dir = self.world_dir(world_name);

        for (dimension, incoming) in set.known_dimensions() {
            if incoming.is_empty() {
                continue;
            }

            let file = world_dir
                .join(dimension_dir_name(dimension))
                .join(WAYPOINT_FILE_NAME);

            let mut lines: Vec<String> = if file.exists() {
                fs::read_to_string(&file)
                    .with_context(|| format!("无法读取 {}", file.display()))?
                    .lines()
                    .map(str::to_string)
                    .collect()
            } else {
                Vec::new()
            };
            let existing_names: HashSet<String> = lines
                .iter()
                .filter_map(|line| XaerosWaypoint::parse_line(line))
                .map(|record| record.name)
                .collect();

            let mut added = 0usize;
            let mut skipped = 0usize;
            for (name, waypoint) in incoming {
                if existing_names.contains(name) {
                    println!("路径点 \"{}\" 已存在，跳过", name);
                    skipped += 1;
                    continue;
                }
                lines.push(XaerosWaypoint::from_neutral(name, waypoint).format_line());
                added += 1;
            }

            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut output = lines.join("\n");
            output.push('\n');
            fs::write(&file, output)
                .with_context(|| format!("无法写入 {}", file.display()))?;
            println!(
                "{} 维度已写入 {} 个路径点（跳过 {} 个重名）",
                dimension.name(),
                added,
                skipped
            );
        }
        Ok(())
    }

    /// 把整个世界目录镜像复制到备份目录
    ///
    /// 世界在 Xaero's 中还没有目录时视为无需备份
    pub fn backup(&self, world_name: &str, dest_root: &Path) -> Result<()> {
        let world_dir = self.world_dir(world_name);
        if !world_dir.is_dir() {
            return Ok(());
        }
        backup::backup_tree(&world_dir, &dest_root.join(world_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE_LINE: &str =
        "waypoint:gold farm portal:G:-295:91:158:3:false:0:01 Portals:false:0:0:false";

    fn sample_world(base: &Path) {
        let dim0 = base.join("TestWorld/dim%0");
        fs::create_dir_all(&dim0).unwrap();
        fs::write(
            dim0.join(WAYPOINT_FILE_NAME),
            "sets:gui.xaero_default:01 Portals\n\
             #\n\
             #waypoint:name:initials:x:y:z:color:disabled:type:set:rotate_on_tp:tp_yaw:visibility_type:destination\n\
             #\n\
             waypoint:Home:H:1:64:2:0:false:0:gui.xaero_default:false:0:0:false\n\
             waypoint:broken line:X:not_a_number\n",
        )
        .unwrap();

        let nether = base.join("TestWorld/dim%-1");
        fs::create_dir_all(&nether).unwrap();
        fs::write(
            nether.join(WAYPOINT_FILE_NAME),
            "waypoint:fortress:F:10:40:-30:11:true:0:gui.xaero_default:false:0:0:false\n",
        )
        .unwrap();

        // 未知维度编号，读入占位桶后被丢弃
        let weird = base.join("TestWorld/dim%12");
        fs::create_dir_all(&weird).unwrap();
        fs::write(
            weird.join(WAYPOINT_FILE_NAME),
            "waypoint:strange:S:0:0:0:0:false:0:gui.xaero_default:false:0:0:false\n",
        )
        .unwrap();
    }

    fn adapter(base: &TempDir) -> XaerosAdapter {
        XaerosAdapter::new(
            base.path().join("XaeroWaypoints"),
            base.path().join(".minecraft"),
        )
    }

    #[test]
    fn parses_world_directory_names() {
        assert_eq!(XaerosAdapter::parse_world_name("BestWorld"), "BestWorld");
        assert_eq!(XaerosAdapter::parse_world_name("Multiplayer_Hypixel"), "Hypixel");
        assert_eq!(XaerosAdapter::parse_world_name("Realms_MyRealm"), "MyRealm");
        assert_eq!(XaerosAdapter::world_type("BestWorld"), WorldType::Singleplayer);
        assert_eq!(XaerosAdapter::world_type("Multiplayer_Hypixel"), WorldType::Multiplayer);
        assert_eq!(XaerosAdapter::world_type("Realms_MyRealm"), WorldType::Realms);
    }

    #[test]
    fn line_roundtrip() {
        let record = XaerosWaypoint::parse_line(SAMPLE_LINE).unwrap();
        assert_eq!(record.name, "gold farm portal");
        assert_eq!(record.x, -295);
        assert_eq!(record.set, "01 Portals");
        assert!(!record.disabled);
        assert_eq!(record.format_line(), SAMPLE_LINE);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(XaerosWaypoint::parse_line("waypoint:too:few:fields").is_none());
        assert!(XaerosWaypoint::parse_line(
            "waypoint:bad:B:abc:64:0:0:false:0:gui.xaero_default:false:0:0:false"
        )
        .is_none());
        assert!(XaerosWaypoint::parse_line(
            "notawaypoint:x:X:1:2:3:0:false:0:gui.xaero_default:false:0:0:false"
        )
        .is_none());
    }

    #[test]
    fn dimension_directory_mapping() {
        assert_eq!(dimension_from_dir("dim%0"), Some(Dimension::Overworld));
        assert_eq!(dimension_from_dir("dim%-1"), Some(Dimension::Nether));
        assert_eq!(dimension_from_dir("dim%1"), Some(Dimension::End));
        assert_eq!(dimension_from_dir("dim%5"), Some(Dimension::Filler));
        assert_eq!(dimension_from_dir("cache"), None);
        for dimension in Dimension::KNOWN {
            assert_eq!(
                dimension_from_dir(&dimension_dir_name(dimension)),
                Some(dimension)
            );
        }
    }

    #[test]
    fn reads_waypoints_into_neutral_format() {
        let dir = tempfile::tempdir().unwrap();
        sample_world(&dir.path().join("XaeroWaypoints"));
        let set = adapter(&dir).to_neutral("TestWorld").unwrap();

        let home = &set.overworld["Home"];
        assert_eq!(home.coordinates.x, 1.0);
        assert!(home.visible);

        // disabled 取反为 visible
        let fortress = &set.nether["fortress"];
        assert!(!fortress.visible);
        assert_eq!(fortress.color, 11);

        // 坏行被跳过，未知维度进入占位桶
        assert_eq!(set.waypoint_count(), 2);
        assert!(set.filler.contains_key("strange"));
    }

    #[test]
    fn missing_world_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        sample_world(&dir.path().join("XaeroWaypoints"));
        assert!(adapter(&dir).to_neutral("Nowhere").is_err());
    }

    #[test]
    fn neutral_roundtrip_truncates_coordinates() {
        let neutral = NeutralWaypoint {
            coordinates: Coordinates { x: 10.9, y: 64.2, z: -5.7 },
            color: 255,
            visible: true,
        };
        let record = XaerosWaypoint::from_neutral("market", &neutral);
        assert_eq!(record.initials, "M");
        assert_eq!((record.x, record.y, record.z), (10, 64, -5));
        assert_eq!(record.set, "gui.xaero_default");

        let restored = record.to_neutral();
        // 浮点坐标经过整数截断后不再等于原值
        assert_eq!(restored.coordinates.x, 10.0);
        assert_eq!(restored.color, 255);
        assert!(restored.visible);
    }

    #[test]
    fn from_neutral_appends_and_preserves_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        sample_world(&dir.path().join("XaeroWaypoints"));
        let adapter = adapter(&dir);

        let mut set = NeutralWaypointSet::new();
        // 与已有的 Home 重名，必须跳过
        set.insert(
            Dimension::Overworld,
            "Home".to_string(),
            NeutralWaypoint {
                coordinates: Coordinates { x: 999.0, y: 999.0, z: 999.0 },
                color: 9,
                visible: true,
            },
        );
        set.insert(
            Dimension::Overworld,
            "farm".to_string(),
            NeutralWaypoint {
                coordinates: Coordinates { x: 3.0, y: 65.0, z: 8.0 },
                color: 2,
                visible: false,
            },
        );

        let file = dir
            .path()
            .join("XaeroWaypoints/TestWorld/dim%0")
            .join(WAYPOINT_FILE_NAME);
        let before = fs::read_to_string(&file).unwrap();

        adapter.from_neutral(&set, "TestWorld").unwrap();

        let after = fs::read_to_string(&file).unwrap();
        // 原有内容（头部、已有记录、甚至坏行）逐字保留
        assert!(after.starts_with(before.trim_end()));
        assert_eq!(after.matches("waypoint:Home:").count(), 1);
        assert!(after.contains("waypoint:farm:F:3:65:8:2:true:0:gui.xaero_default:false:0:0:false"));
    }

    #[test]
    fn from_neutral_creates_missing_dimension_directory() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = adapter(&dir);

        let mut set = NeutralWaypointSet::new();
        set.insert(
            Dimension::End,
            "gateway".to_string(),
            NeutralWaypoint {
                coordinates: Coordinates { x: 100.0, y: 75.0, z: 0.0 },
                color: 14,
                visible: true,
            },
        );
        adapter.from_neutral(&set, "FreshWorld").unwrap();

        let file = dir
            .path()
            .join("XaeroWaypoints/FreshWorld/dim%1")
            .join(WAYPOINT_FILE_NAME);
        let content = fs::read_to_string(&file).unwrap();
        assert!(content.contains("waypoint:gateway:G:100:75:0:14:false"));
    }
}
