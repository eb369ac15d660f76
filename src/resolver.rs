//! 世界/服务器名称的模糊解析
//!
//! 对适配器给出的候选列表做大小写不敏感的子串匹配。
//! 候选列表由多个来源直接拼接，可能包含重复条目，
//! 匹配时按独立条目处理

use anyhow::{bail, Result};
use std::io::{BufRead, Write};

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 没有任何候选包含搜索串
    NotFound,
    /// 恰好一个匹配
    Found(String),
    /// 多个匹配，需要进一步选择
    Ambiguous(Vec<String>),
}

/// 返回所有包含搜索串的候选（大小写不敏感）
pub fn matching_worlds(worlds: &[String], search: &str) -> Vec<String> {
    let needle = search.to_lowercase();
    worlds
        .iter()
        .filter(|world| world.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// 在候选列表中解析搜索串，不做任何交互
pub fn resolve(worlds: &[String], search: &str) -> Resolution {
    let mut matches = matching_worlds(worlds, search);
    match matches.len() {
        0 => Resolution::NotFound,
        1 => Resolution::Found(matches.remove(0)),
        _ => Resolution::Ambiguous(matches),
    }
}

/// 让用户从编号列表中选择一项，返回 1 开始的序号
///
/// 非数字或超出范围的输入会被拒绝并重新询问，绝不默默取默认值。
/// 输入流结束视为错误
pub fn select_list_option(
    options: &[String],
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<usize> {
    for (i, option) in options.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, option)?;
    }

    loop {
        write!(output, "请输入序号: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("输入流已结束，未作出选择");
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if (1..=options.len()).contains(&choice) => return Ok(choice),
            _ => writeln!(output, "无效的序号，请输入 1 到 {}", options.len())?,
        }
    }
}

/// 解析搜索串，多个匹配时交互式让用户选择
///
/// 未找到时打印提示并返回 `None`，由调用方决定重新询问还是中止
pub fn resolve_interactive(
    worlds: &[String],
    search: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Option<String>> {
    match resolve(worlds, search) {
        Resolution::NotFound => {
            writeln!(output, "没有找到名称包含 \"{}\" 的世界/服务器", search)?;
            Ok(None)
        }
        Resolution::Found(world) => Ok(Some(world)),
        Resolution::Ambiguous(candidates) => {
            writeln!(output, "找到多个名称包含 \"{}\" 的世界/服务器，请选择:", search)?;
            let choice = select_list_option(&candidates, input, output)?;
            Ok(Some(candidates[choice - 1].clone()))
        }
    }
}
