//! 转换流程编排
//!
//! 一次转换的固定顺序：备份两侧 → 源 Mod 读出标准格式 →
//! 标准格式快照落盘 → 写入目标 Mod。
//! 所有写出都是整文件替换，且在备份之后进行；
//! 任何一步失败直接返回错误，不做重试

use crate::adapter::Adapter;
use crate::backup;
use crate::snapshot::StandardWorldWaypoints;
use anyhow::{Context, Result};
use std::path::Path;

/// 把 `from_world` 的路径点从源 Mod 转换到目标 Mod 的 `to_world`
///
/// 两个世界标识必须已经通过各自 Mod 的候选列表解析完成
pub fn convert_waypoints(
    from: &Adapter,
    to: &mut Adapter,
    from_world: &str,
    to_world: &str,
    data_root: &Path,
) -> Result<()> {
    // 备份两侧当前状态，共用一个时间戳
    let timestamp = backup::timestamp();
    from.backup(
        from_world,
        &backup::backup_root(data_root, &timestamp, from.mod_name()),
    )
    .with_context(|| format!("备份 {} 失败", from.mod_name()))?;
    to.backup(
        to_world,
        &backup::backup_root(data_root, &timestamp, to.mod_name()),
    )
    .with_context(|| format!("备份 {} 失败", to.mod_name()))?;

    // 源 Mod → 标准格式
    let world_name = from.parse_world_name(from_world).to_string();
    let world_type = from.world_type(from_world);
    let neutral = from.to_neutral(from_world)?;
    println!(
        "从 {} 读出 {} 个路径点",
        from.mod_name(),
        neutral.waypoint_count()
    );

    // 标准格式快照落盘（审计记录）
    let snapshot = StandardWorldWaypoints::new(data_root, &world_name, world_type, from.mod_name());
    snapshot.write_waypoints(&neutral)?;
    println!("标准格式快照已保存: {}", snapshot.path().display());

    // 标准格式 → 目标 Mod
    to.from_neutral(&neutral, to_world)
}
