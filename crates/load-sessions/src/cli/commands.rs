//! CLI 命令定义
//!
//! 命令行参数优先于配置文件与环境变量，未指定的参数沿用配置中的值。

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// 商城 API 会话负载工具
#[derive(Parser, Debug)]
#[command(name = "storefront-load")]
#[command(version, about = "模拟商城 API 客户端会话的负载工具")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，默认取配置
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// 配置文件路径（TOML）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// 子命令枚举
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 运行模拟会话
    ///
    /// 启动指定数量的会话，运行到时长结束或按 Ctrl+C，最后打印汇总。
    Run {
        /// 会话模板 (storefront, gateway)
        #[arg(short, long)]
        profile: Option<String>,

        /// 目标 API 根地址
        #[arg(long)]
        host: Option<String>,

        /// 并发会话数
        #[arg(short, long)]
        users: Option<usize>,

        /// 运行时长（秒）
        #[arg(short, long)]
        duration: Option<u64>,

        /// 随机种子，用于复现任务序列
        #[arg(long)]
        seed: Option<u64>,
    },

    /// 打印任务表
    Tasks {
        /// 会话模板 (storefront, gateway)
        #[arg(short, long)]
        profile: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::parse_from(["storefront-load", "run"]);
        assert!(cli.log_level.is_none());
        assert!(cli.config.is_none());
        match cli.command {
            Commands::Run {
                profile,
                host,
                users,
                duration,
                seed,
            } => {
                assert!(profile.is_none());
                assert!(host.is_none());
                assert!(users.is_none());
                assert!(duration.is_none());
                assert!(seed.is_none());
            }
            _ => panic!("预期 Run 命令"),
        }
    }

    #[test]
    fn test_cli_parse_run_with_args() {
        let cli = Cli::parse_from([
            "storefront-load",
            "run",
            "--profile",
            "gateway",
            "--host",
            "http://localhost:8000",
            "-u",
            "25",
            "-d",
            "120",
            "--seed",
            "42",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Run {
                profile,
                host,
                users,
                duration,
                seed,
            } => {
                assert_eq!(profile.as_deref(), Some("gateway"));
                assert_eq!(host.as_deref(), Some("http://localhost:8000"));
                assert_eq!(users, Some(25));
                assert_eq!(duration, Some(120));
                assert_eq!(seed, Some(42));
            }
            _ => panic!("预期 Run 命令"),
        }
    }

    #[test]
    fn test_cli_parse_tasks() {
        let cli = Cli::parse_from([
            "storefront-load",
            "--config",
            "load.toml",
            "tasks",
            "-p",
            "storefront",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("load.toml")));
        match cli.command {
            Commands::Tasks { profile } => assert_eq!(profile.as_deref(), Some("storefront")),
            _ => panic!("预期 Tasks 命令"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["storefront-load", "swarm"]).is_err());
    }
}
