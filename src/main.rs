// ==========================================
// 车辆积载计划系统 - 命令行入口
// ==========================================
// 用法: loading-plan --input snapshot.json [--calendar cal.csv] [--config cfg.json]
//       [--profile id] [--strategy simple|full] [--start YYYY-MM-DD] [--days N]
// 输出: 积载计划 JSON（标准输出或 --out 指定文件）
// ==========================================

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use loading_plan::config::ConfigManager;
use loading_plan::engine::aggregator::parse_date;
use loading_plan::importer::{load_calendar_csv, load_snapshot};
use loading_plan::{logging, LoadingPlanner, PlanRequest, StrategyKind};
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;

const INPUT_ARG: &str = "input";
const CALENDAR_ARG: &str = "calendar";
const CONFIG_ARG: &str = "config";
const PROFILE_ARG: &str = "profile";
const STRATEGY_ARG: &str = "strategy";
const START_ARG: &str = "start";
const DAYS_ARG: &str = "days";
const OUT_ARG: &str = "out";
const LOG_JSON_ARG: &str = "log-json";

fn get_app() -> Command {
    Command::new("loading-plan")
        .version(loading_plan::VERSION)
        .about("车辆积载计划: 按营业日、按车辆分配交货需求")
        .arg(
            Arg::new(INPUT_ARG)
                .help("规划输入快照 (JSON)")
                .short('i')
                .long(INPUT_ARG)
                .required(true),
        )
        .arg(Arg::new(CALENDAR_ARG).help("营业日历 (CSV: date,is_working_day)").long(CALENDAR_ARG))
        .arg(Arg::new(CONFIG_ARG).help("规划参数配置 (JSON)").short('c').long(CONFIG_ARG))
        .arg(Arg::new(PROFILE_ARG).help("客户配置 ID").short('p').long(PROFILE_ARG))
        .arg(
            Arg::new(STRATEGY_ARG)
                .help("分配策略")
                .short('s')
                .long(STRATEGY_ARG)
                .value_parser(["simple", "full"]),
        )
        .arg(Arg::new(START_ARG).help("规划起始日 (YYYY-MM-DD)，默认今天").long(START_ARG))
        .arg(Arg::new(DAYS_ARG).help("规划营业日数").short('d').long(DAYS_ARG))
        .arg(Arg::new(OUT_ARG).help("输出文件，默认标准输出").short('o').long(OUT_ARG))
        .arg(
            Arg::new(LOG_JSON_ARG)
                .help("以 JSON 格式输出日志")
                .long(LOG_JSON_ARG)
                .action(ArgAction::SetTrue),
        )
}

fn create_write_buffer(out_file: Option<File>) -> BufWriter<Box<dyn Write>> {
    if let Some(out_file) = out_file {
        BufWriter::new(Box::new(out_file))
    } else {
        BufWriter::new(Box::new(stdout()))
    }
}

fn build_request(matches: &ArgMatches) -> Result<PlanRequest> {
    let start = match matches.get_one::<String>(START_ARG) {
        Some(raw) => parse_date(raw).ok_or_else(|| anyhow!("无法解析起始日: '{raw}'"))?,
        None => chrono::Local::now().date_naive(),
    };
    let days = matches
        .get_one::<String>(DAYS_ARG)
        .map(|raw| raw.parse::<usize>().with_context(|| format!("无法解析规划天数: '{raw}'")))
        .transpose()?;
    let strategy = matches
        .get_one::<String>(STRATEGY_ARG)
        .map(|raw| raw.parse::<StrategyKind>().map_err(|err| anyhow!(err)))
        .transpose()?;

    Ok(PlanRequest {
        start,
        days,
        strategy,
        profile_id: matches.get_one::<String>(PROFILE_ARG).cloned(),
    })
}

fn run(matches: &ArgMatches) -> Result<()> {
    let config = ConfigManager::load(matches.get_one::<String>(CONFIG_ARG).map(Path::new))
        .context("配置加载失败")?;
    tracing::info!(source = ?config.source(), "配置已加载");

    let input_path = matches
        .get_one::<String>(INPUT_ARG)
        .ok_or_else(|| anyhow!("缺少 --input 参数"))?;
    let input = load_snapshot(Path::new(input_path)).context("快照加载失败")?;

    let mut planner = LoadingPlanner::new(config.into_config());
    if let Some(path) = matches.get_one::<String>(CALENDAR_ARG) {
        let calendar = load_calendar_csv(Path::new(path)).context("日历加载失败")?;
        planner = planner.with_calendar(calendar.into_shared());
    }

    let request = build_request(matches)?;
    let plan = planner.plan_request(&input, &request).context("规划请求无效")?;

    let out_file = matches
        .get_one::<String>(OUT_ARG)
        .map(|path| File::create(path).with_context(|| format!("无法创建输出文件 '{path}'")))
        .transpose()?;
    let mut writer = create_write_buffer(out_file);
    serde_json::to_writer_pretty(&mut writer, &plan).context("计划序列化失败")?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let matches = get_app().get_matches();
    if matches.get_flag(LOG_JSON_ARG) {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", loading_plan::APP_NAME, loading_plan::VERSION);
    tracing::info!("==================================================");

    run(&matches)
}
