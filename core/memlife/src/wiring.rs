//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, NoopLog, StdClock, StdEnvResolver, StdFileSystem};
use common::error::Error;
use common::ports::outbound::{Clock, EnvResolver, FileSystem, Log};

use crate::adapter::{ConfigOverrides, FsMemoryStore, LoggingMemoryStore, StdConfigResolver};
use crate::cli::PROGRAM;
use crate::domain::MemoryConfig;
use crate::ports::outbound::MemoryStore;
use crate::usecase::{CompletionUseCase, ExtractionUseCase, JanitorUseCase, PendingUseCase};

/// 配線で組み立てたユースケース群（main の Command ディスパッチで利用）
pub struct App {
    pub config: MemoryConfig,
    /// save --file の入力読み込み用
    pub fs: Arc<dyn FileSystem>,
    /// 構造化ログ（ファイルへ JSONL）。コンソール表示とは別。
    pub logger: Arc<dyn Log>,
    pub pending: Arc<PendingUseCase>,
    pub extraction: ExtractionUseCase,
    pub completion: CompletionUseCase,
    pub janitor: JanitorUseCase,
}

/// 解決済みの設定とポートから App を組み立てる
pub fn assemble(
    config: MemoryConfig,
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    logger: Arc<dyn Log>,
) -> App {
    let inner: Arc<dyn MemoryStore> =
        Arc::new(FsMemoryStore::new(Arc::clone(&fs), config.clone()));
    let store: Arc<dyn MemoryStore> =
        Arc::new(LoggingMemoryStore::new(inner, Arc::clone(&logger)));
    let pending = Arc::new(PendingUseCase::new(
        Arc::clone(&store),
        Arc::clone(&clock),
        Arc::clone(&logger),
        config.min_log_chars,
    ));
    let extraction = ExtractionUseCase::new(
        Arc::clone(&store),
        Arc::clone(&logger),
        config.max_prompt_chars,
    );
    let completion = CompletionUseCase::new(
        Arc::clone(&store),
        Arc::clone(&clock),
        Arc::clone(&logger),
        Arc::clone(&pending),
        PROGRAM,
    );
    let janitor = JanitorUseCase::new(
        store,
        clock,
        Arc::clone(&logger),
        config.ttl,
        config.max_summary_lines,
    );
    App {
        config,
        fs,
        logger,
        pending,
        extraction,
        completion,
        janitor,
    }
}

/// 配線: 標準アダプタで App を組み立てる
pub fn wire_memlife(overrides: &ConfigOverrides) -> Result<App, Error> {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let logger: Arc<dyn Log> = env_resolver
        .resolve_log_file_path()
        .map(|path| Arc::new(FileJsonLog::new(Arc::clone(&fs), path)) as Arc<dyn Log>)
        .unwrap_or_else(|_| Arc::new(NoopLog));
    let config = StdConfigResolver::new(env_resolver).resolve(overrides)?;
    Ok(assemble(config, fs, Arc::new(StdClock), logger))
}
