use std::time::Duration;

use tracing::info;

use crate::error::{ReelError, ReelResult};
use crate::graph::GraphClient;

const PUBLISH_TIMEOUT: Duration = Duration::from_secs(60);

/// Turns an uploaded container into a live post and returns the post id.
pub async fn publish(graph: &GraphClient, container_id: &str) -> ReelResult<String> {
    let reply = graph
        .post_query(
            &graph.publish_endpoint(),
            &[("creation_id", container_id)],
            PUBLISH_TIMEOUT,
        )
        .await?;

    let post_id = reply.str_field("id").ok_or_else(|| {
        ReelError::Publish(format!(
            "container {} not published: {}",
            container_id,
            reply.describe()
        ))
    })?;
    info!("✅ Reel published: {}", post_id);
    Ok(post_id)
}
