//! 데이터베이스 및 실행 환경 설정 관리 모듈
//!
//! MongoDB 연결, 로깅, 환경 파일 로드 관련 설정을 관리합니다.

use std::env;
use std::time::Duration;

use env_logger::Env;
use log::{error, info};
use once_cell::sync::OnceCell;

use crate::errors::{AppError, AppResult};

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
const DEFAULT_DATABASE_NAME: &str = "user_model_dev";
const DEFAULT_APP_NAME: &str = "mongo_user_model";
const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: u64 = 5;

/// MongoDB 연결 설정
///
/// ## 환경 변수
/// - `MONGODB_URI`: MongoDB 연결 URI (기본값: "mongodb://localhost:27017")
/// - `DATABASE_NAME`: URI에 기본 데이터베이스가 없을 때 사용할 이름 (기본값: "user_model_dev")
/// - `MONGODB_APP_NAME`: 서버 로그에 표시될 애플리케이션 이름
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS`: 서버 선택 타임아웃 (기본값: 5초)
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub uri: String,
    pub database_name: String,
    pub app_name: String,
    pub server_selection_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGODB_URI.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            server_selection_timeout: Duration::from_secs(DEFAULT_SERVER_SELECTION_TIMEOUT_SECS),
        }
    }
}

impl DatabaseConfig {
    /// `.env` 파일을 로드한 뒤 환경 변수에서 설정을 읽습니다.
    ///
    /// ```rust,ignore
    /// let config = DatabaseConfig::load()?;
    /// let store = MongoDatabase::from_config(&config, pool);
    /// ```
    pub fn load() -> AppResult<Self> {
        load_env_file();
        Self::from_env()
    }

    /// 현재 프로세스 환경 변수에서 설정을 읽습니다.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 키 조회 함수로부터 설정을 구성합니다.
    ///
    /// 값이 없으면 기본값을 사용하고, 파싱할 수 없는 값은 `ConfigError`가 됩니다.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let server_selection_timeout = match lookup("MONGODB_SERVER_SELECTION_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|e| {
                AppError::ConfigError(format!(
                    "MONGODB_SERVER_SELECTION_TIMEOUT_SECS 파싱 실패 ({}): {}",
                    raw, e
                ))
            })?,
            None => defaults.server_selection_timeout,
        };

        Ok(Self {
            uri: lookup("MONGODB_URI").unwrap_or(defaults.uri),
            database_name: lookup("DATABASE_NAME").unwrap_or(defaults.database_name),
            app_name: lookup("MONGODB_APP_NAME").unwrap_or(defaults.app_name),
            server_selection_timeout,
        })
    }
}

static ENV_FILE_LOADED: OnceCell<()> = OnceCell::new();

/// 환경별 설정 파일을 로드합니다 (프로세스당 한 번)
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
pub fn load_env_file() {
    ENV_FILE_LOADED.get_or_init(|| {
        let profile = env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

        match profile.as_str() {
            "prod" => match dotenv::from_filename(".env.prod") {
                Ok(_) => info!(".env.prod 파일 로드 됨"),
                Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
            },
            "dev" => match dotenv::from_filename(".env.dev") {
                Ok(_) => info!(".env.dev 파일 로드 됨"),
                Err(e) => info!(".env.dev 파일 없음, 환경 변수만 사용: {}", e),
            },
            _ => {
                dotenv::dotenv().ok();
                info!("기본 .env 파일 로드");
            }
        }
    });
}

/// 로깅 시스템을 초기화합니다
///
/// `RUST_LOG`가 없으면 "info,mongodb=warn" 레벨을 사용합니다.
/// 이미 초기화된 경우 아무 것도 하지 않습니다.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info,mongodb=warn"))
        .is_test(cfg!(test))
        .try_init();
}
