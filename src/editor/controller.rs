// 文本编辑对话框控制器
// 负责 加载 → 显示 → 编辑 → 校验 → 写入 → 关闭 的完整流程
// 所有异步操作拆成 begin（同步状态切换）/ run（纯 IO）/ finish（应用结果）三段，
// UI 层把 run 丢到 SSH 运行时执行，测试直接 await 便捷方法

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use super::error::EditorError;
use super::form::{EditorForm, FieldRule, TEXT_FIELD};
use super::reporter::ErrorReporter;
use crate::models::settings::EditorSettings;
use crate::models::{EditSession, FileKind, FileRef, TransferLink};
use crate::services::fs::{FileSystem, WatchEvent, WatchEventKind, WatchHandle};
use crate::services::sftp::{
    ensure_parent_dir, get_temp_edit_dir, temp_file_path, RemoteFileHandle, SftpConnector,
};

/// 调用方传入的属性
#[derive(Debug, Clone)]
pub struct TextEditorProps {
    pub file: FileRef,
    pub visible: bool,
}

/// 注入的协作者
#[derive(Clone)]
pub struct EditorServices {
    pub fs: Arc<dyn FileSystem>,
    /// SFTP 句柄工厂
    pub sftp: Arc<dyn SftpConnector>,
    pub reporter: Arc<dyn ErrorReporter>,
}

/// 回调
pub struct EditorCallbacks {
    /// 写入成功后触发
    pub after_write: Box<dyn Fn() + Send + Sync>,
    /// 对话框关闭时触发（每个可见周期一次）
    pub on_close: Box<dyn Fn() + Send + Sync>,
}

impl Default for EditorCallbacks {
    fn default() -> Self {
        Self {
            after_write: Box::new(|| {}),
            on_close: Box::new(|| {}),
        }
    }
}

/// 控制器选项
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// 远程文件的临时下载目录
    pub temp_dir: PathBuf,
    /// 会话 ID，参与临时文件命名
    pub session_id: String,
    /// 可编辑文件大小上限（字节），None 表示不限制
    pub max_edit_file_size: Option<u64>,
    /// 外置编辑器保存并回传后是否关闭对话框
    pub close_after_external_save: bool,
    /// 收到文件变化后等待写入完成的时间
    pub upload_settle: Duration,
}

impl EditorOptions {
    pub fn from_settings(settings: &EditorSettings, session_id: impl Into<String>) -> Self {
        let temp_dir = if settings.temp_dir.trim().is_empty() {
            get_temp_edit_dir()
        } else {
            PathBuf::from(settings.temp_dir.trim())
        };
        Self {
            temp_dir,
            session_id: session_id.into(),
            max_edit_file_size: settings.max_edit_file_size(),
            close_after_external_save: settings.close_after_external_save,
            upload_settle: Duration::from_millis(settings.upload_settle_ms),
        }
    }
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self::from_settings(&EditorSettings::default(), "local")
    }
}

/// 本地编辑状态
#[derive(Debug, Clone)]
pub struct LocalEdit {
    /// 加载时的原始内容
    pub original_text: String,
}

/// 远程文件外置编辑状态
pub struct RemoteExternalEdit {
    pub link: TransferLink,
    handle: Arc<dyn RemoteFileHandle>,
    watcher: Option<Box<dyn WatchHandle>>,
}

impl RemoteExternalEdit {
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }
}

impl fmt::Debug for RemoteExternalEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteExternalEdit")
            .field("link", &self.link)
            .field("watching", &self.is_watching())
            .finish()
    }
}

/// 对话框阶段
#[derive(Debug, Default)]
pub enum EditPhase {
    #[default]
    Closed,
    Loading,
    Editing(LocalEdit),
    ExternalWatch(RemoteExternalEdit),
    /// 加载失败，只能取消
    Failed,
}

/// 加载任务（可跨线程执行）
pub struct LoadTask {
    generation: u64,
    file: FileRef,
    path: String,
    fs: Arc<dyn FileSystem>,
    sftp: Arc<dyn SftpConnector>,
    options: EditorOptions,
    watch_tx: UnboundedSender<WatchEvent>,
}

/// 加载成功的产出
pub enum LoadOutcome {
    Local {
        text: String,
    },
    Remote {
        link: TransferLink,
        handle: Arc<dyn RemoteFileHandle>,
        watcher: Box<dyn WatchHandle>,
    },
}

/// 加载结果
pub struct LoadResult {
    generation: u64,
    outcome: Result<LoadOutcome, EditorError>,
}

fn check_size(path: &str, size: u64, limit: Option<u64>) -> Result<(), EditorError> {
    match limit {
        Some(limit) if size > limit => Err(EditorError::TooLarge {
            path: path.to_string(),
            size,
            limit,
        }),
        _ => Ok(()),
    }
}

/// 合并已排队的监控事件，只保留最新一个
///
/// 编辑器原地保存时会先截断再写入，一次保存可能产生多个事件
pub fn coalesce_watch_events(
    first: WatchEvent,
    events: &mut UnboundedReceiver<WatchEvent>,
) -> WatchEvent {
    let mut latest = first;
    let mut merged = 0;
    while let Ok(event) = events.try_recv() {
        latest = event;
        merged += 1;
    }
    if merged > 0 {
        debug!("[Editor] Merged {} queued watch events", merged);
    }
    latest
}

impl LoadTask {
    pub async fn run(self) -> LoadResult {
        let outcome = match self.file.kind {
            FileKind::Local => self.load_local().await,
            FileKind::Remote => self.load_remote().await,
        };
        LoadResult {
            generation: self.generation,
            outcome,
        }
    }

    async fn load_local(&self) -> Result<LoadOutcome, EditorError> {
        let path = Path::new(&self.path);

        if self.options.max_edit_file_size.is_some() {
            let size = self
                .fs
                .file_size(path)
                .await
                .map_err(|source| EditorError::Read {
                    path: self.path.clone(),
                    source,
                })?;
            check_size(&self.path, size, self.options.max_edit_file_size)?;
        }

        let text = self
            .fs
            .read_file(path)
            .await
            .map_err(|source| EditorError::Read {
                path: self.path.clone(),
                source,
            })?;

        debug!("[Editor] Read {} bytes from {}", text.len(), self.path);
        Ok(LoadOutcome::Local { text })
    }

    async fn load_remote(&self) -> Result<LoadOutcome, EditorError> {
        let handle = self
            .sftp
            .connect()
            .await
            .map_err(|source| EditorError::Connect {
                path: self.path.clone(),
                source,
            })?;

        if self.options.max_edit_file_size.is_some() {
            let size = handle
                .file_size(&self.path)
                .await
                .map_err(|source| EditorError::Download {
                    path: self.path.clone(),
                    source,
                })?;
            check_size(&self.path, size, self.options.max_edit_file_size)?;
        }

        let local_path =
            temp_file_path(&self.options.temp_dir, &self.options.session_id, &self.path);
        ensure_parent_dir(&local_path).map_err(|source| EditorError::TempFile {
            path: local_path.display().to_string(),
            source,
        })?;

        handle
            .download(&self.path, &local_path, self.file.mode)
            .await
            .map_err(|source| EditorError::Download {
                path: self.path.clone(),
                source,
            })?;

        self.fs
            .open_file(&local_path)
            .await
            .map_err(|source| EditorError::OpenExternal {
                path: local_path.display().to_string(),
                source,
            })?;

        let watch_tx = self.watch_tx.clone();
        let watched = local_path.clone();
        let watcher = self
            .fs
            .watch(
                &local_path,
                Box::new(move |event: WatchEvent| {
                    if event.kind == WatchEventKind::Change && event.path == watched {
                        let _ = watch_tx.send(event);
                    }
                }),
            )
            .map_err(|source| EditorError::Watch {
                path: local_path.display().to_string(),
                source,
            })?;

        info!(
            "[Editor] Editing {} externally via {:?}",
            self.path, local_path
        );

        Ok(LoadOutcome::Remote {
            link: TransferLink {
                remote_path: self.path.clone(),
                local_path,
                file: self.file.clone(),
            },
            handle,
            watcher,
        })
    }
}

enum WriteTarget {
    Local(Arc<dyn FileSystem>),
    Remote {
        handle: Option<Arc<dyn RemoteFileHandle>>,
        connector: Arc<dyn SftpConnector>,
    },
}

/// 写入任务
pub struct WriteTask {
    path: String,
    text: String,
    mode: Option<u32>,
    target: WriteTarget,
}

impl WriteTask {
    /// 返回写入是否被接受
    pub async fn run(self) -> Result<bool, EditorError> {
        info!("[Editor] Writing {} bytes to {}", self.text.len(), self.path);
        match self.target {
            WriteTarget::Local(fs) => fs
                .write_file(Path::new(&self.path), &self.text, self.mode)
                .await
                .map_err(|source| EditorError::WriteLocal {
                    path: self.path.clone(),
                    source,
                }),
            WriteTarget::Remote { handle, connector } => {
                let handle = match handle {
                    Some(handle) => handle,
                    None => connector
                        .connect()
                        .await
                        .map_err(|source| EditorError::WriteRemote {
                            path: self.path.clone(),
                            source,
                        })?,
                };
                handle
                    .write_file(&self.path, &self.text, self.mode)
                    .await
                    .map_err(|source| EditorError::WriteRemote {
                        path: self.path.clone(),
                        source,
                    })
            }
        }
    }
}

/// 提交的处理结果
pub enum SubmitStep {
    /// 加载中 / 校验失败 / 当前阶段不可提交
    Ignored,
    /// 内容未变化，等同取消
    Cancelled,
    Write(WriteTask),
}

/// 回传任务
pub struct UploadTask {
    link: TransferLink,
    handle: Arc<dyn RemoteFileHandle>,
}

impl UploadTask {
    pub async fn run(self) -> Result<u64, EditorError> {
        self.handle
            .upload(
                &self.link.local_path,
                &self.link.remote_path,
                self.link.file.mode,
            )
            .await
            .map_err(|source| EditorError::Upload {
                local_path: self.link.local_path.display().to_string(),
                remote_path: self.link.remote_path.clone(),
                source,
            })
    }
}

/// 文本编辑对话框控制器
pub struct TextEditorController {
    props: TextEditorProps,
    services: EditorServices,
    callbacks: EditorCallbacks,
    options: EditorOptions,
    session: EditSession,
    phase: EditPhase,
    form: EditorForm,
    /// 每次加载自增，用于丢弃过期结果
    generation: u64,
    mounted: bool,
    /// 写入或回传尚未完成
    writing: bool,
    watch_tx: UnboundedSender<WatchEvent>,
    watch_rx: Option<UnboundedReceiver<WatchEvent>>,
}

impl TextEditorController {
    pub fn new(
        props: TextEditorProps,
        services: EditorServices,
        callbacks: EditorCallbacks,
        options: EditorOptions,
    ) -> Self {
        let mut form = EditorForm::new();
        let rules = options
            .max_edit_file_size
            .map(FieldRule::MaxBytes)
            .into_iter()
            .collect();
        form.register(TEXT_FIELD, "", rules);

        let (watch_tx, watch_rx) = mpsc::unbounded_channel();

        Self {
            props,
            services,
            callbacks,
            options,
            session: EditSession::default(),
            phase: EditPhase::Closed,
            form,
            generation: 0,
            mounted: false,
            writing: false,
            watch_tx,
            watch_rx: Some(watch_rx),
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn phase(&self) -> &EditPhase {
        &self.phase
    }

    pub fn form(&self) -> &EditorForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut EditorForm {
        &mut self.form
    }

    pub fn file(&self) -> &FileRef {
        &self.props.file
    }

    pub fn is_visible(&self) -> bool {
        self.props.visible
    }

    pub fn is_loading(&self) -> bool {
        self.session.loading
    }

    /// 写入或回传进行中，此时不能关闭
    pub fn is_writing(&self) -> bool {
        self.writing
    }

    /// 对话框内的输入是否可提交 / 重置（仅本地编辑且空闲时）
    pub fn accepts_input(&self) -> bool {
        !self.session.loading && matches!(self.phase, EditPhase::Editing(_))
    }

    pub fn upload_settle(&self) -> Duration {
        self.options.upload_settle
    }

    /// 是否处于外置编辑模式
    pub fn is_external(&self) -> bool {
        matches!(self.phase, EditPhase::ExternalWatch(_))
    }

    /// 当前监控的临时文件
    pub fn watched_path(&self) -> Option<&Path> {
        match &self.phase {
            EditPhase::ExternalWatch(remote) if remote.is_watching() => {
                Some(remote.link.local_path.as_path())
            }
            _ => None,
        }
    }

    /// 同步输入框内容到表单
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.form.set_value(TEXT_FIELD, text);
    }

    /// 取走监控事件接收端（UI 层自行驱动）
    pub fn take_watch_events(&mut self) -> Option<UnboundedReceiver<WatchEvent>> {
        self.watch_rx.take()
    }

    /// 挂载：可见时开始加载
    pub fn mount(&mut self) -> Option<LoadTask> {
        self.mounted = true;
        if self.props.visible {
            Some(self.begin_load())
        } else {
            None
        }
    }

    /// 重新显示对话框
    pub fn show(&mut self) -> LoadTask {
        self.mounted = true;
        self.props.visible = true;
        self.begin_load()
    }

    pub fn begin_load(&mut self) -> LoadTask {
        self.close_watcher();
        self.generation += 1;

        let path = self.props.file.resolved_path();
        info!("[Editor] Loading {}", path);

        self.session.loading = true;
        self.session.path = path.clone();
        self.session.text.clear();
        self.phase = EditPhase::Loading;

        LoadTask {
            generation: self.generation,
            file: self.props.file.clone(),
            path,
            fs: self.services.fs.clone(),
            sftp: self.services.sftp.clone(),
            options: self.options.clone(),
            watch_tx: self.watch_tx.clone(),
        }
    }

    pub fn finish_load(&mut self, result: LoadResult) {
        if result.generation != self.generation || !self.mounted || !self.props.visible {
            debug!(
                "[Editor] Discarding stale load (generation {})",
                result.generation
            );
            if let Ok(LoadOutcome::Remote { mut watcher, .. }) = result.outcome {
                watcher.close();
            }
            return;
        }

        self.session.loading = false;
        match result.outcome {
            Ok(LoadOutcome::Local { text }) => {
                self.session.text = text.clone();
                self.form.set_initial(TEXT_FIELD, text.clone());
                self.phase = EditPhase::Editing(LocalEdit {
                    original_text: text,
                });
            }
            Ok(LoadOutcome::Remote {
                link,
                handle,
                watcher,
            }) => {
                self.form.set_initial(TEXT_FIELD, "");
                self.phase = EditPhase::ExternalWatch(RemoteExternalEdit {
                    link,
                    handle,
                    watcher: Some(watcher),
                });
            }
            Err(e) => {
                self.phase = EditPhase::Failed;
                self.services.reporter.report(&e);
            }
        }
    }

    /// 挂载并完成加载
    pub async fn open(&mut self) {
        if let Some(task) = self.mount() {
            let result = task.run().await;
            self.finish_load(result);
        }
    }

    pub async fn load(&mut self) {
        let task = self.begin_load();
        let result = task.run().await;
        self.finish_load(result);
    }

    /// 对话框保存：外置编辑和加载失败时输入框不代表文件内容，直接忽略
    pub fn submit_text(&mut self, text: impl Into<String>) -> SubmitStep {
        if !self.accepts_input() {
            debug!("[Editor] Dialog submit ignored in {:?}", self.phase);
            return SubmitStep::Ignored;
        }
        self.set_text(text);
        self.begin_submit()
    }

    pub fn begin_submit(&mut self) -> SubmitStep {
        if self.session.loading {
            debug!("[Editor] Submit ignored while loading");
            return SubmitStep::Ignored;
        }

        let cached_handle = match &self.phase {
            EditPhase::Editing(_) => None,
            EditPhase::ExternalWatch(remote) => Some(remote.handle.clone()),
            _ => return SubmitStep::Ignored,
        };

        let values = match self.form.validate() {
            Ok(values) => values,
            Err(errors) => {
                debug!(
                    "[Editor] Validation failed on field '{}'",
                    errors.first_invalid
                );
                return SubmitStep::Ignored;
            }
        };
        let Some(text) = values.get(TEXT_FIELD).map(str::to_string) else {
            return SubmitStep::Ignored;
        };

        if text == self.session.text {
            info!("[Editor] Content unchanged, closing {}", self.session.path);
            self.cancel();
            return SubmitStep::Cancelled;
        }

        self.session.loading = true;
        self.writing = true;

        let target = if self.props.file.is_remote() {
            WriteTarget::Remote {
                handle: cached_handle,
                connector: self.services.sftp.clone(),
            }
        } else {
            WriteTarget::Local(self.services.fs.clone())
        };

        SubmitStep::Write(WriteTask {
            path: self.session.path.clone(),
            text,
            mode: self.props.file.mode,
            target,
        })
    }

    pub fn finish_submit(&mut self, result: Result<bool, EditorError>) {
        self.session.loading = false;
        self.writing = false;
        match result {
            Ok(true) => {
                info!("[Editor] Saved {}", self.session.path);
                (self.callbacks.after_write)();
                self.close();
            }
            Ok(false) => {
                warn!("[Editor] Write to {} was rejected", self.session.path);
                self.services.reporter.report(&EditorError::WriteRejected {
                    path: self.session.path.clone(),
                });
            }
            Err(e) => self.services.reporter.report(&e),
        }
    }

    pub async fn submit(&mut self) {
        if let SubmitStep::Write(task) = self.begin_submit() {
            let result = task.run().await;
            self.finish_submit(result);
        }
    }

    /// 临时文件变化时生成回传任务
    pub fn begin_upload(&mut self, event: &WatchEvent) -> Option<UploadTask> {
        if event.kind != WatchEventKind::Change {
            return None;
        }
        let EditPhase::ExternalWatch(remote) = &self.phase else {
            debug!("[Editor] Ignoring watch event outside external editing");
            return None;
        };
        if event.path != remote.link.local_path {
            return None;
        }

        info!(
            "[Editor] {:?} changed, uploading to {}",
            remote.link.local_path, remote.link.remote_path
        );
        let task = UploadTask {
            link: remote.link.clone(),
            handle: remote.handle.clone(),
        };
        self.writing = true;
        Some(task)
    }

    pub fn finish_upload(&mut self, result: Result<u64, EditorError>) {
        self.writing = false;
        match result {
            Ok(bytes) => {
                info!("[Editor] Uploaded {} bytes to {}", bytes, self.session.path);
                if self.options.close_after_external_save {
                    self.close();
                }
            }
            Err(e) => self.services.reporter.report(&e),
        }
    }

    pub async fn handle_watch_event(&mut self, event: WatchEvent) {
        if let Some(task) = self.begin_upload(&event) {
            let result = task.run().await;
            self.finish_upload(result);
        }
    }

    /// 任务未返回结果（运行时已关闭）时恢复空闲状态
    pub fn abandon_transfer(&mut self) {
        warn!("[Editor] Transfer for {} did not complete", self.session.path);
        self.session.loading = false;
        self.writing = false;
    }

    /// 合并并处理所有已排队的监控事件，返回处理批次
    pub async fn drain_watch_events(&mut self) -> usize {
        let Some(mut events) = self.watch_rx.take() else {
            return 0;
        };
        let mut handled = 0;
        while let Ok(first) = events.try_recv() {
            let event = coalesce_watch_events(first, &mut events);
            self.handle_watch_event(event).await;
            handled += 1;
        }
        self.watch_rx = Some(events);
        handled
    }

    /// 恢复为加载时的内容
    pub fn reset(&mut self) {
        if !self.accepts_input() {
            return;
        }
        self.form.reset_fields();
    }

    /// 取消；写入未完成时忽略，避免进程退出打断写入
    pub fn cancel(&mut self) {
        if self.writing {
            debug!("[Editor] Cancel ignored while writing {}", self.session.path);
            return;
        }
        self.close();
    }

    fn close(&mut self) {
        let was_visible = self.props.visible;
        self.props.visible = false;
        self.close_watcher();
        self.phase = EditPhase::Closed;
        self.session.loading = false;
        self.writing = false;
        if was_visible {
            (self.callbacks.on_close)();
        }
    }

    fn close_watcher(&mut self) {
        if let EditPhase::ExternalWatch(remote) = &mut self.phase {
            if let Some(mut watcher) = remote.watcher.take() {
                watcher.close();
                info!("[Editor] Stopped watching {:?}", remote.link.local_path);
            }
        }
    }

    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.close_watcher();
    }
}

impl Drop for TextEditorController {
    fn drop(&mut self) {
        self.unmount();
    }
}
