//! 配置文件加载与管理

use crate::adapter::Adapter;
use crate::lunar::{self, LunarAdapter};
use crate::xaeros::{self, XaerosAdapter};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 数据目录配置（快照、备份、convert-here 沙盒）
    pub data: DataConfig,
    /// Minecraft 安装目录配置（存档列表、服务器列表）
    pub minecraft: MinecraftConfig,
    /// Lunar Client 配置
    pub lunar: LunarConfig,
    /// Xaero's Minimap 配置
    pub xaeros: XaerosConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// 数据根目录
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinecraftConfig {
    /// `.minecraft` 目录
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LunarConfig {
    /// 路径点 JSON 文件
    pub waypoints_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XaerosConfig {
    /// 路径点根目录
    pub base_dir: PathBuf,
}

// ============== 默认值 ==============

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            minecraft: MinecraftConfig::default(),
            lunar: LunarConfig::default(),
            xaeros: XaerosConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("data"),
        }
    }
}

impl Default for MinecraftConfig {
    fn default() -> Self {
        Self {
            root: default_minecraft_dir(),
        }
    }
}

impl Default for LunarConfig {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            waypoints_file: home
                .join(".lunarclient")
                .join("settings")
                .join("game")
                .join("waypoints.json"),
        }
    }
}

impl Default for XaerosConfig {
    fn default() -> Self {
        Self {
            base_dir: default_minecraft_dir().join("XaeroWaypoints"),
        }
    }
}

/// `.minecraft` 的默认位置：Windows 下在 `%APPDATA%`，其余系统在用户主目录
fn default_minecraft_dir() -> PathBuf {
    let base = env::var_os("APPDATA")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(".minecraft")
}

// ============== 配置加载 ==============

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mcwc").join("config.toml"))
    }

    /// 按优先级加载配置：
    /// 1. 当前目录的 mcwc.toml
    /// 2. 用户配置目录的 config.toml
    /// 3. 默认配置
    pub fn load() -> Self {
        let local_config = Path::new("mcwc.toml");
        if local_config.exists() {
            if let Ok(config) = Self::load_from_file(local_config) {
                eprintln!("已加载配置: mcwc.toml");
                return config;
            }
        }

        if let Some(user_config) = Self::default_config_path() {
            if user_config.exists() {
                if let Ok(config) = Self::load_from_file(&user_config) {
                    eprintln!("已加载配置: {}", user_config.display());
                    return config;
                }
            }
        }

        Self::default()
    }

    /// 切换到 convert-here 模式：两个 Mod 的存储路径都指向
    /// `<data 根目录>/convert-here/<mod 名>/...` 沙盒副本，
    /// 不再操作 Mod 的实际安装
    pub fn apply_convert_here(&mut self) {
        let sandbox = self.data.root.join("convert-here");
        self.lunar.waypoints_file = sandbox.join(lunar::MOD_NAME).join("waypoints.json");
        self.xaeros.base_dir = sandbox.join(xaeros::MOD_NAME);
    }

    /// 按显示名构造适配器实例
    pub fn make_adapter(&self, mod_name: &str) -> Result<Adapter> {
        match mod_name {
            lunar::MOD_NAME => Ok(Adapter::Lunar(LunarAdapter::new(
                self.lunar.waypoints_file.clone(),
                self.minecraft.root.clone(),
            )?)),
            xaeros::MOD_NAME => Ok(Adapter::Xaeros(XaerosAdapter::new(
                self.xaeros.base_dir.clone(),
                self.minecraft.root.clone(),
            ))),
            _ => bail!("未知的 Mod: {}", mod_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_roundtrip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.data.root, config.data.root);
        assert_eq!(parsed.lunar.waypoints_file, config.lunar.waypoints_file);
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let parsed: Config = toml::from_str("[data]\nroot = \"elsewhere\"\n").unwrap();
        assert_eq!(parsed.data.root, PathBuf::from("elsewhere"));
        assert_eq!(parsed.xaeros.base_dir, XaerosConfig::default().base_dir);
    }

    #[test]
    fn convert_here_redirects_both_mods() {
        let mut config = Config::default();
        config.data.root = PathBuf::from("data");
        config.apply_convert_here();
        assert_eq!(
            config.lunar.waypoints_file,
            Path::new("data/convert-here/lunar client/waypoints.json")
        );
        assert_eq!(
            config.xaeros.base_dir,
            Path::new("data/convert-here/xaero's minimap")
        );
    }
}
