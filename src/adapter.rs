//! Mod 适配器的统一接口
//!
//! 两个具体适配器收拢在一个封闭的枚举后面，调用方通过它统一访问，
//! 不使用按名称注册的全局表：适配器实例由配置显式构造，
//! 再显式传给转换流程

use crate::lunar::{self, LunarAdapter};
use crate::schema::NeutralWaypointSet;
use crate::worlds::WorldType;
use crate::xaeros::{self, XaerosAdapter};
use anyhow::Result;
use std::path::Path;

/// 具体 Mod 适配器
pub enum Adapter {
    Lunar(LunarAdapter),
    Xaeros(XaerosAdapter),
}

impl Adapter {
    /// Mod 的显示名，同时用于备份目录和快照文件名
    pub fn mod_name(&self) -> &'static str {
        match self {
            Adapter::Lunar(_) => lunar::MOD_NAME,
            Adapter::Xaeros(_) => xaeros::MOD_NAME,
        }
    }

    /// 所有已知的世界/服务器标识，多个来源拼接、不去重
    pub fn list_worlds(&self) -> Vec<String> {
        match self {
            Adapter::Lunar(adapter) => adapter.list_worlds(),
            Adapter::Xaeros(adapter) => adapter.list_worlds(),
        }
    }

    /// 从 Mod 的标识约定解析出通用的世界名（纯字符串处理）
    pub fn parse_world_name<'a>(&self, world_name: &'a str) -> &'a str {
        match self {
            Adapter::Lunar(_) => LunarAdapter::parse_world_name(world_name),
            Adapter::Xaeros(_) => XaerosAdapter::parse_world_name(world_name),
        }
    }

    /// 标识对应的世界类型（纯字符串处理）
    pub fn world_type(&self, world_name: &str) -> WorldType {
        match self {
            Adapter::Lunar(_) => LunarAdapter::world_type(world_name),
            Adapter::Xaeros(_) => XaerosAdapter::world_type(world_name),
        }
    }

    /// 读取指定世界并转换为标准格式
    pub fn to_neutral(&self, world_name: &str) -> Result<NeutralWaypointSet> {
        match self {
            Adapter::Lunar(adapter) => adapter.to_neutral(world_name),
            Adapter::Xaeros(adapter) => adapter.to_neutral(world_name),
        }
    }

    /// 把标准格式合并进指定世界并持久化
    pub fn from_neutral(&mut self, set: &NeutralWaypointSet, world_name: &str) -> Result<()> {
        match self {
            Adapter::Lunar(adapter) => adapter.from_neutral(set, world_name),
            Adapter::Xaeros(adapter) => adapter.from_neutral(set, world_name),
        }
    }

    /// 把当前磁盘状态复制到备份目录
    pub fn backup(&self, world_name: &str, dest_root: &Path) -> Result<()> {
        match self {
            Adapter::Lunar(adapter) => adapter.backup(world_name, dest_root),
            Adapter::Xaeros(adapter) => adapter.backup(world_name, dest_root),
        }
    }
}
