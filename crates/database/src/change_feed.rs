//! 数据变更通知
//!
//! 每次写操作提交后，仓库会向 [`ChangeFeed`] 发布一条 [`ChangeEvent`]。
//! 订阅方（例如SSE接口）收到通知后重新查询，得到最新快照。

use tokio::sync::broadcast;

/// 广播通道默认容量
const DEFAULT_CAPACITY: usize = 256;

/// 文档集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    Applications,
    Users,
    Teams,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Applications => "applications",
            Collection::Users => "users",
            Collection::Teams => "teams",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// 一次已提交的写操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub document_id: String,
    pub kind: ChangeKind,
}

/// 进程内变更广播
///
/// 内部是一个 [`broadcast::Sender`]，clone 之后共享同一个通道。
/// 接收方处理过慢时会收到 `RecvError::Lagged`，此时直接重新查询即可。
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// 发布变更，没有订阅者时直接丢弃
    pub fn publish(&self, collection: Collection, document_id: impl Into<String>, kind: ChangeKind) {
        let _ = self.sender.send(ChangeEvent {
            collection,
            document_id: document_id.into(),
            kind,
        });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let feed = ChangeFeed::default();
        let mut rx = feed.subscribe();

        feed.publish(Collection::Applications, "app-1", ChangeKind::Created);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.collection, Collection::Applications);
        assert_eq!(event.document_id, "app-1");
        assert_eq!(event.kind, ChangeKind::Created);
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let feed = ChangeFeed::default();
        feed.publish(Collection::Teams, "team-1", ChangeKind::Deleted);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn dropping_receiver_unsubscribes() {
        let feed = ChangeFeed::default();
        let rx = feed.subscribe();
        assert_eq!(feed.subscriber_count(), 1);
        drop(rx);
        assert_eq!(feed.subscriber_count(), 0);
    }
}
