//! Minecraft 路径点转换工具 - 在小地图 Mod 之间迁移路径点

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use mcwc::{convert_waypoints, lunar, resolver, xaeros, Adapter, Config};

/// Minecraft 路径点转换工具 - 在小地图 Mod 之间迁移路径点
#[derive(Parser)]
#[command(name = "mcwc", version, about)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 在两个 Mod 之间转换路径点
    Convert {
        /// 在 data/convert-here 沙盒目录中转换，不触碰 Mod 的实际安装
        #[arg(long)]
        convert_here: bool,
        /// 世界/服务器名称，只需给出一部分；省略时交互询问。
        /// 给出此参数时解析失败直接报错退出，不再追问
        #[arg(short, long)]
        world: Option<String>,
        /// 源 Mod（lunar / xaeros），省略时交互选择
        #[arg(long)]
        from: Option<String>,
        /// 目标 Mod（lunar / xaeros），省略时交互选择
        #[arg(long)]
        to: Option<String>,
    },
    /// 列出指定 Mod 已知的世界/服务器
    Worlds {
        /// Mod 名称（lunar / xaeros）
        mod_name: String,
    },
    /// 生成默认配置文件
    Config {
        /// 输出路径（默认: mcwc.toml）
        #[arg(short, long, default_value = "mcwc.toml")]
        output: PathBuf,
        /// 覆盖已存在的文件
        #[arg(long)]
        force: bool,
    },
}

fn load_config(config_path: Option<PathBuf>) -> Config {
    if let Some(path) = config_path {
        match Config::load_from_file(&path) {
            Ok(config) => {
                eprintln!("已加载配置: {}", path.display());
                return config;
            }
            Err(e) => {
                eprintln!("警告: 无法加载配置 {}: {}", path.display(), e);
            }
        }
    }
    Config::load()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = load_config(cli.config);

    match cli.command {
        Commands::Convert {
            convert_here,
            world,
            from,
            to,
        } => {
            if convert_here {
                println!("运行模式: convert-here");
                config.apply_convert_here();
            } else {
                println!("运行模式: standard");
            }
            cmd_convert(&config, world, from, to)?;
        }

        Commands::Worlds { mod_name } => {
            let adapter = config.make_adapter(canonical_mod_name(&mod_name)?)?;
            for world in adapter.list_worlds() {
                println!("{}", world);
            }
        }

        Commands::Config { output, force } => {
            if output.exists() && !force {
                bail!("文件已存在: {:?}\n使用 --force 覆盖", output);
            }
            let default_config = Config::default();
            default_config.save_to_file(&output)?;
            println!("已生成配置文件: {:?}", output);
            println!("\n配置项说明:");
            println!("  [data]      root           # 快照/备份/沙盒的数据根目录");
            println!("  [minecraft] root           # .minecraft 目录（存档与服务器列表）");
            println!("  [lunar]     waypoints_file # Lunar Client 路径点文件");
            println!("  [xaeros]    base_dir       # Xaero's Minimap 路径点根目录");
        }
    }

    Ok(())
}

/// 把命令行给出的 Mod 名归一化为显示名
fn canonical_mod_name(name: &str) -> Result<&'static str> {
    match name.to_lowercase().as_str() {
        "lunar" | "lunar client" => Ok(lunar::MOD_NAME),
        "xaero" | "xaeros" | "xaero's minimap" => Ok(xaeros::MOD_NAME),
        _ => bail!("未知的 Mod: {}（可选: lunar / xaeros）", name),
    }
}

fn cmd_convert(
    config: &Config,
    world: Option<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let (from_name, to_name) = match (from, to) {
        (Some(from), Some(to)) => {
            let from = canonical_mod_name(&from)?;
            let to = canonical_mod_name(&to)?;
            if from == to {
                bail!("源和目标不能是同一个 Mod");
            }
            (from, to)
        }
        _ => choose_mods(&mut input, &mut output)?,
    };

    let from_adapter = config.make_adapter(from_name)?;
    let mut to_adapter = config.make_adapter(to_name)?;

    // --world 给出时为自动模式，解析失败直接报错
    let interactive = world.is_none();
    let mut search = match world {
        Some(world) => world,
        None => prompt_for_answer(
            "单人世界或多人服务器的名称是? (只需给出一部分，如 \"best\" 可匹配 \"best world\")",
            &mut input,
            &mut output,
        )?,
    };

    // 同一个搜索串在两侧 Mod 中解析，任一侧未找到则整体重新询问
    let (from_world, to_world) = loop {
        let resolved = resolve_both(
            &from_adapter,
            &to_adapter,
            &search,
            &mut input,
            &mut output,
        )?;
        if let Some(pair) = resolved {
            break pair;
        }
        if !interactive {
            bail!("未能解析世界 \"{}\"，转换中止", search);
        }
        search = prompt_for_answer("请重新输入世界/服务器名称", &mut input, &mut output)?;
    };

    convert_waypoints(
        &from_adapter,
        &mut to_adapter,
        &from_world,
        &to_world,
        &config.data.root,
    )?;
    println!("转换成功!");
    Ok(())
}

/// 交互式选择源/目标 Mod，两者必须不同
fn choose_mods(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<(&'static str, &'static str)> {
    let options = vec![lunar::MOD_NAME.to_string(), xaeros::MOD_NAME.to_string()];
    loop {
        writeln!(output, "请选择源 Mod:")?;
        let from = resolver::select_list_option(&options, input, output)?;
        writeln!(output, "请选择目标 Mod:")?;
        let to = resolver::select_list_option(&options, input, output)?;
        if from == to {
            writeln!(output, "源和目标不能是同一个 Mod，请重新选择")?;
            continue;
        }
        let names = [lunar::MOD_NAME, xaeros::MOD_NAME];
        return Ok((names[from - 1], names[to - 1]));
    }
}

/// 在源和目标两侧解析同一个搜索串
fn resolve_both(
    from: &Adapter,
    to: &Adapter,
    search: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Option<(String, String)>> {
    writeln!(output, "({}):", from.mod_name())?;
    let Some(from_world) = resolver::resolve_interactive(&from.list_worlds(), search, input, output)?
    else {
        return Ok(None);
    };
    writeln!(output, "({}):", to.mod_name())?;
    let Some(to_world) = resolver::resolve_interactive(&to.list_worlds(), search, input, output)?
    else {
        return Ok(None);
    };
    Ok(Some((from_world, to_world)))
}

/// 询问一个非空答案
fn prompt_for_answer(
    message: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<String> {
    loop {
        writeln!(output, "{}", message)?;
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("输入流已结束");
        }
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}
