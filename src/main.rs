//! 工作区访问控制命令行
//! 查看意图注册表、诊断导航决策与意图检查

use anyhow::{anyhow, bail, Context};
use std::sync::Arc;
use workspace_access::{
    config::AppConfig,
    models::{
        intent::Intent,
        role::{PermissionGrant, Role},
        route::Location,
        session::{Actor, AuthCapabilities, AuthSessionState},
    },
    realtime::{LocationStore, NavigationWatcher, SessionStore},
    services::{
        workspace_service::NoopInvalidator, AccessContext, IntentResolver, Navigator,
        RbacEvaluator, WorkspaceScopeTracker,
    },
    telemetry,
};

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let Some(command) = args.first() else {
        print_help();
        return Ok(());
    };

    match command.as_str() {
        "--version" => {
            println!("workspace-access {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "--help" | "-h" => {
            print_help();
            return Ok(());
        }
        _ => {}
    }

    // 加载 .env 文件（开发环境）
    if let Ok(env) = std::env::var("ACCESS_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    telemetry::init_telemetry(&config.logging).map_err(|e| anyhow!(e))?;

    let rest = &args[1..];
    match command.as_str() {
        "intents" => print_intents(),
        "route" => route(&config, rest),
        "check" => check(rest),
        other => {
            eprintln!("未知命令: {}", other);
            print_help();
            std::process::exit(1);
        }
    }
}

/// 打印意图注册表
fn print_intents() -> anyhow::Result<()> {
    let table: Vec<_> = Intent::ALL
        .iter()
        .map(|intent| {
            let binding = intent.binding();
            serde_json::json!({
                "intent": intent,
                "resourceType": binding.resource_type,
                "role": binding.role,
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

/// 计算导航决策
fn route(config: &AppConfig, args: &[String]) -> anyhow::Result<()> {
    let Some(raw_location) = args.first() else {
        bail!("route 需要一个路径参数");
    };

    let mut initialized = true;
    let mut signed_in = false;
    let mut logged_out = false;
    let mut reset_required = false;
    let mut login_available = true;
    let mut settle = false;

    for flag in &args[1..] {
        match flag.as_str() {
            "--uninitialized" => initialized = false,
            "--signed-in" => signed_in = true,
            "--logged-out" => logged_out = true,
            "--reset-required" => reset_required = true,
            "--no-login" => login_available = false,
            "--settle" => settle = true,
            other => bail!("未知参数: {}", other),
        }
    }

    let capabilities = AuthCapabilities {
        login_available,
        ..AuthCapabilities::with_login()
    };
    let actor = signed_in.then(|| Actor::new("cli@localhost"));
    let navigator = Navigator::new(config.navigation.clone());

    let decision = if settle {
        let sessions = SessionStore::new();
        if initialized {
            sessions.initialize(None, capabilities)?;
            if logged_out {
                sessions.logout()?;
            }
            if reset_required {
                sessions.require_password_reset()?;
            }
            if let Some(actor) = actor {
                sessions.login(actor)?;
            }
        }
        let locations = Arc::new(LocationStore::new(raw_location.as_str()));
        let mut watcher = NavigationWatcher::new(
            navigator,
            &sessions,
            locations,
            WorkspaceScopeTracker::new(NoopInvalidator),
        );
        watcher.settle()
    } else {
        let session = if initialized {
            AuthSessionState {
                requires_password_reset: reset_required,
                logged_out,
                ..AuthSessionState::initialized(actor, capabilities)
            }
        } else {
            AuthSessionState::uninitialized()
        };
        navigator.decide(&session, &Location::parse(raw_location))
    };

    println!("{}", serde_json::to_string_pretty(&decision)?);
    Ok(())
}

/// 检查意图：check <Intent> [--resource-id ID] [--grant SCOPE[:ID]=ROLE]...
fn check(args: &[String]) -> anyhow::Result<()> {
    let Some(raw_intent) = args.first() else {
        bail!("check 需要一个意图名称");
    };
    let intent: Intent = raw_intent.parse().map_err(|e: String| anyhow!(e))?;

    let mut resource_id = None;
    let mut grants = Vec::new();
    let mut context = AccessContext::new();

    let mut iter = args[1..].iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| anyhow!("参数 {} 缺少值", flag))?;
        match flag.as_str() {
            "--resource-id" => resource_id = Some(value.clone()),
            "--grant" => grants.push(parse_grant(value)?),
            "--organization" => context.organization_id = Some(value.clone()),
            "--workspace" => context.workspace_id = Some(value.clone()),
            other => bail!("未知参数: {}", other),
        }
    }

    let resolver = IntentResolver::new(RbacEvaluator::new(grants, context));
    let allowed = resolver.check_named(intent, resource_id.clone())?;

    let output = serde_json::json!({
        "intent": intent,
        "query": intent.query(resource_id),
        "allowed": allowed,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// 解析 `instance=ADMIN`、`organization:org-1=READER`、`workspace:ws-1=EDITOR`
fn parse_grant(raw: &str) -> anyhow::Result<PermissionGrant> {
    let (scope, role) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("授权格式错误: {}", raw))?;
    let role: Role = role.parse().map_err(|e: String| anyhow!(e))?;

    match scope.split_once(':') {
        None if scope.eq_ignore_ascii_case("instance") => Ok(PermissionGrant::instance(role)),
        Some((kind, id)) if kind.eq_ignore_ascii_case("organization") => {
            Ok(PermissionGrant::organization(id, role))
        }
        Some((kind, id)) if kind.eq_ignore_ascii_case("workspace") => {
            Ok(PermissionGrant::workspace(id, role))
        }
        _ => bail!("未知授权范围: {}", scope),
    }
}

/// 打印帮助信息
fn print_help() {
    println!("workspace-access {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: workspace-access <命令> [选项]");
    println!();
    println!("命令:");
    println!("  intents                       打印意图注册表");
    println!("  route <路径> [标志]           计算导航决策");
    println!("      --uninitialized  --signed-in  --logged-out");
    println!("      --reset-required --no-login   --settle");
    println!("  check <意图> [选项]           检查意图");
    println!("      --resource-id ID  --grant SCOPE[:ID]=ROLE");
    println!("      --organization ID --workspace ID");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  ACCESS_LOGGING__LEVEL, ACCESS_LOGGING__FORMAT");
    println!("  ACCESS_NAVIGATION__RETURN_PARAM, ACCESS_NAVIGATION__ACCOUNT_SETTINGS_PATH");
    println!("  ACCESS_NAVIGATION__MAX_REDIRECT_HOPS");
}
