//! 标准路径点格式（各 Mod 之间转换的中间表示）

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 游戏维度
///
/// 只有三个已知维度会被写出；未知的维度编号进入 `Filler` 占位桶，
/// 在任何输出之前被丢弃
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Overworld,
    Nether,
    End,
    Filler,
}

impl Dimension {
    /// 三个可写出的已知维度
    pub const KNOWN: [Dimension; 3] = [Dimension::Overworld, Dimension::Nether, Dimension::End];

    /// 从 Mod 的维度编号映射到维度
    ///
    /// 已知编号只有 {0, -1, 1}；其余编号含义不明，不能擅自归类
    pub fn from_index(index: i64) -> Dimension {
        match index {
            0 => Dimension::Overworld,
            -1 => Dimension::Nether,
            1 => Dimension::End,
            _ => Dimension::Filler,
        }
    }

    /// 维度编号（`from_index` 的逆映射）
    ///
    /// `Filler` 返回占位值 2，实际上永远不会被写出
    pub fn index(self) -> i64 {
        match self {
            Dimension::Overworld => 0,
            Dimension::Nether => -1,
            Dimension::End => 1,
            Dimension::Filler => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Overworld => "overworld",
            Dimension::Nether => "nether",
            Dimension::End => "end",
            Dimension::Filler => "filler",
        }
    }
}

/// 路径点坐标
///
/// 统一使用 f64：Lunar Client 原生为浮点数，Xaero's 为整数，
/// 各适配器在写出时自行做数值转换
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 单个路径点的标准表示（只保留所有 Mod 共有的字段）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeutralWaypoint {
    pub coordinates: Coordinates,
    pub color: i64,
    pub visible: bool,
}

/// 维度内的路径点集合，名称 → 路径点，保留插入顺序
pub type WaypointMap = IndexMap<String, NeutralWaypoint>;

/// 单个世界的标准路径点集合
///
/// 序列化格式（YAML 快照与此一致）：
///
/// ```yaml
/// overworld:
///   WAYPOINT_NAME:
///     coordinates:
///       x: 10.0
///       y: 64.0
///       z: -5.0
///     color: 255
///     visible: true
/// nether:
///   ...
/// ```
///
/// 空的维度在序列化时整体省略
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeutralWaypointSet {
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub overworld: WaypointMap,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub nether: WaypointMap,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub end: WaypointMap,
    /// 未知维度的占位桶，永不序列化、永不写入任何 Mod
    #[serde(skip)]
    pub filler: WaypointMap,
}

impl NeutralWaypointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimension(&self, dimension: Dimension) -> &WaypointMap {
        match dimension {
            Dimension::Overworld => &self.overworld,
            Dimension::Nether => &self.nether,
            Dimension::End => &self.end,
            Dimension::Filler => &self.filler,
        }
    }

    pub fn dimension_mut(&mut self, dimension: Dimension) -> &mut WaypointMap {
        match dimension {
            Dimension::Overworld => &mut self.overworld,
            Dimension::Nether => &mut self.nether,
            Dimension::End => &mut self.end,
            Dimension::Filler => &mut self.filler,
        }
    }

    /// 插入路径点，同名时保留先写入的（先写者优先）
    pub fn insert(&mut self, dimension: Dimension, name: String, waypoint: NeutralWaypoint) {
        self.dimension_mut(dimension).entry(name).or_insert(waypoint);
    }

    /// 合并另一个集合，冲突的名称保留本集合中已有的路径点
    pub fn merge(&mut self, other: NeutralWaypointSet) {
        for dimension in Dimension::KNOWN {
            for (name, waypoint) in other.dimension(dimension) {
                self.insert(dimension, name.clone(), waypoint.clone());
            }
        }
    }

    /// 三个可写出的维度及其路径点
    pub fn known_dimensions(&self) -> [(Dimension, &WaypointMap); 3] {
        [
            (Dimension::Overworld, &self.overworld),
            (Dimension::Nether, &self.nether),
            (Dimension::End, &self.end),
        ]
    }

    /// 可写出的路径点总数（不含占位桶）
    pub fn waypoint_count(&self) -> usize {
        self.overworld.len() + self.nether.len() + self.end.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoint_count() == 0
    }
}
