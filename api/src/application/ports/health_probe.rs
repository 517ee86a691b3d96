use async_trait::async_trait;

#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Round-trips to the backing store.
    async fn ping(&self) -> anyhow::Result<()>;
}
