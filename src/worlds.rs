//! 世界/服务器候选列表的公共来源
//!
//! 各 Mod 的候选列表由三部分拼接：Mod 自己已有路径点的世界、
//! `.minecraft/saves` 下的单人存档、以及 `servers.dat` 中的服务器列表

use anyhow::{bail, Context, Result};
use fastnbt::Value;
use std::fs;
use std::path::Path;

/// 世界类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldType {
    Singleplayer,
    Multiplayer,
    Realms,
}

impl WorldType {
    /// 用于快照目录名的固定写法
    pub fn as_str(self) -> &'static str {
        match self {
            WorldType::Singleplayer => "singleplayer",
            WorldType::Multiplayer => "multiplayer",
            WorldType::Realms => "realms",
        }
    }
}

/// `.minecraft/saves` 下的单人存档文件夹名
///
/// 目录不存在时返回空列表
pub fn singleplayer_saves(minecraft_dir: &Path) -> Vec<String> {
    let saves_dir = minecraft_dir.join("saves");
    let Ok(entries) = fs::read_dir(&saves_dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect()
}

/// `servers.dat` 中的多人服务器，渲染为 `"<name> (ip: <ip>)"`
///
/// 文件不存在时返回空列表；解析失败返回错误，由调用方降级处理
pub fn multiplayer_servers(minecraft_dir: &Path) -> Result<Vec<String>> {
    let servers_path = minecraft_dir.join("servers.dat");
    if !servers_path.exists() {
        return Ok(Vec::new());
    }

    let data = fs::read(&servers_path)
        .with_context(|| format!("无法读取 {}", servers_path.display()))?;
    let root: Value = fastnbt::from_bytes(&data)
        .with_context(|| format!("无法解析 {}", servers_path.display()))?;

    let Value::Compound(root) = root else {
        bail!("servers.dat 根节点不是 Compound");
    };
    let Some(Value::List(servers)) = root.get("servers") else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(servers.len());
    for server in servers {
        let Value::Compound(server) = server else {
            continue;
        };
        let name = match server.get("name") {
            Some(Value::String(name)) => name.as_str(),
            _ => continue,
        };
        let ip = match server.get("ip") {
            Some(Value::String(ip)) => ip.as_str(),
            _ => continue,
        };
        out.push(format!("{} (ip: {})", name, ip));
    }
    Ok(out)
}
