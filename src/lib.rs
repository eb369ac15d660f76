//! Minecraft 路径点转换工具
//!
//! 在不同小地图 Mod 之间迁移路径点，以标准中间格式作为中转

pub mod adapter;
pub mod backup;
pub mod config;
pub mod convert;
pub mod lunar;
pub mod resolver;
pub mod schema;
pub mod snapshot;
pub mod worlds;
pub mod xaeros;

pub use adapter::Adapter;
pub use config::Config;
pub use convert::convert_waypoints;
pub use lunar::LunarAdapter;
pub use schema::{Coordinates, Dimension, NeutralWaypoint, NeutralWaypointSet, WaypointMap};
pub use snapshot::StandardWorldWaypoints;
pub use worlds::WorldType;
pub use xaeros::{XaerosAdapter, XaerosWaypoint};
