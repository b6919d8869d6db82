use super::backend::PrefsBackend;
use super::keys::PreferenceSet;
use crate::error::{BackendError, SettingsError};
use std::io;
use std::sync::{Arc, mpsc};
use std::thread::{self, JoinHandle};

type FlushReply = mpsc::Sender<Result<(), Arc<BackendError>>>;

enum WriteOp {
    Persist(PreferenceSet),
    Flush(FlushReply),
}

/// 后台写入线程句柄
///
/// 写入请求只携带整份快照，排队的多次写入合并为最后一次。
/// 保存失败的快照保留为脏数据，下一批写入、`flush` 或退出时重试。
/// Drop 时关闭队列并等待线程把剩余写入落盘。
pub(crate) struct Writer {
    tx: Option<mpsc::Sender<WriteOp>>,
    handle: Option<JoinHandle<()>>,
}

/// 写入线程内部状态；`dirty` 与 `last_err` 同时存在或同时为空
struct WriterState {
    backend: Box<dyn PrefsBackend>,
    dirty: Option<PreferenceSet>,
    last_err: Option<Arc<BackendError>>,
}

impl WriterState {
    fn save(&mut self) {
        let Some(snapshot) = self.dirty.take() else {
            return;
        };
        match self.backend.persist(&snapshot) {
            Ok(()) => {
                tracing::debug!(entries = snapshot.len(), "设置已落盘");
                self.last_err = None;
            }
            Err(e) => {
                tracing::warn!(err = %e, location = %self.backend.location(), "保存设置失败");
                self.last_err = Some(Arc::new(e));
                self.dirty = Some(snapshot);
            }
        }
    }

    fn status(&self) -> Result<(), Arc<BackendError>> {
        match &self.last_err {
            Some(e) => Err(Arc::clone(e)),
            None => Ok(()),
        }
    }

    fn run(mut self, rx: mpsc::Receiver<WriteOp>) {
        while let Ok(first) = rx.recv() {
            let mut waiters = Vec::new();
            let mut next = Some(first);
            while let Some(op) = next {
                match op {
                    WriteOp::Persist(snapshot) => self.dirty = Some(snapshot),
                    WriteOp::Flush(reply) => waiters.push(reply),
                }
                next = rx.try_recv().ok();
            }

            self.save();
            for reply in waiters {
                let _ = reply.send(self.status());
            }
        }

        self.save();
        if self.dirty.is_some() {
            tracing::error!(location = %self.backend.location(), "退出时设置仍未落盘");
        } else {
            tracing::debug!("设置写入线程退出");
        }
    }
}

impl Writer {
    pub(crate) fn spawn(backend: Box<dyn PrefsBackend>) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<WriteOp>();
        let state = WriterState {
            backend,
            dirty: None,
            last_err: None,
        };
        let handle = thread::Builder::new()
            .name("prefs-writer".to_owned())
            .spawn(move || state.run(rx))?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    pub(crate) fn submit(&self, snapshot: PreferenceSet) -> Result<(), SettingsError> {
        self.sender()?
            .send(WriteOp::Persist(snapshot))
            .map_err(|_| SettingsError::WriterGone)
    }

    /// 阻塞直到此前提交的写入全部落盘；仍有未落盘数据时返回 [`SettingsError::Unsaved`]
    pub(crate) fn flush(&self) -> Result<(), SettingsError> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.sender()?
            .send(WriteOp::Flush(reply_tx))
            .map_err(|_| SettingsError::WriterGone)?;
        match reply_rx.recv() {
            Ok(res) => res.map_err(SettingsError::Unsaved),
            Err(_) => Err(SettingsError::WriterGone),
        }
    }

    fn sender(&self) -> Result<&mpsc::Sender<WriteOp>, SettingsError> {
        self.tx.as_ref().ok_or(SettingsError::WriterGone)
    }
}

impl Drop for Writer {
    fn drop(&mut self) {
        drop(self.tx.take());
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.join().is_err() {
            tracing::error!("设置写入线程异常退出");
        }
    }
}
