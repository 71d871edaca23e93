use anyhow::{Context, Result};
use async_trait::async_trait;
use pulse::{Pulse, PulseError, Room, Rooms};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::results::{self, EnrollmentResult};

// EnrollmentApi is the slice of the pulse api the batch needs
#[async_trait]
pub trait EnrollmentApi {
    async fn list_rooms(&self) -> Result<Rooms, PulseError>;
    async fn regenerate_code(&self, room: &Room) -> Result<String, PulseError>;
}

#[async_trait]
impl EnrollmentApi for Pulse {
    async fn list_rooms(&self) -> Result<Rooms, PulseError> {
        return self.rooms().await;
    }

    async fn regenerate_code(&self, room: &Room) -> Result<String, PulseError> {
        return self.regenerate_dec(&room.id).await;
    }
}

pub struct EnrollmentBatchRunner<A: EnrollmentApi> {
    api: A,
    request_delay: Duration,
    rate_limit_backoff: Duration,
}

impl<A: EnrollmentApi + Sync> EnrollmentBatchRunner<A> {
    pub fn new(api: A, request_delay: Duration, rate_limit_backoff: Duration) -> Self {
        EnrollmentBatchRunner {
            api: api,
            request_delay: request_delay,
            rate_limit_backoff: rate_limit_backoff,
        }
    }

    pub async fn list_rooms(&self) -> Result<Rooms> {
        let rooms = self
            .api
            .list_rooms()
            .await
            .context("failed to list rooms")?;
        info!(count = rooms.len(), "found rooms");
        return Ok(rooms);
    }

    /// Regenerates the code for a single room. Errors never escape, they become
    /// a failed result. The second value is any extra pause the api asked for
    /// by rate limiting the request.
    pub async fn regenerate_code(&self, room: &Room) -> (EnrollmentResult, Option<Duration>) {
        match self.api.regenerate_code(room).await {
            Ok(code) => {
                info!(
                    room_id = %room.id,
                    room_name = %room.name,
                    "generated device enrollment code"
                );
                (EnrollmentResult::success(room, code), None)
            }
            Err(PulseError::RateLimited { retry_after }) => {
                let backoff = retry_after.unwrap_or(self.rate_limit_backoff);
                warn!(
                    room_id = %room.id,
                    backoff_secs = backoff.as_secs_f32(),
                    "rate limited while generating device enrollment code"
                );
                (EnrollmentResult::failed(room), Some(backoff))
            }
            Err(e) => {
                warn!(
                    room_id = %room.id,
                    room_name = %room.name,
                    "failed to generate device enrollment code: {}",
                    e
                );
                (EnrollmentResult::failed(room), None)
            }
        }
    }

    /// Produces exactly one result per room, in room order.
    pub async fn process_rooms(&self, rooms: &[Room]) -> Vec<EnrollmentResult> {
        let mut results = Vec::with_capacity(rooms.len());
        let mut backoff: Option<Duration> = None;

        for (index, room) in rooms.iter().enumerate() {
            // the rooms listing always goes first, so every regenerate call is paced
            let pause = self.request_delay + backoff.take().unwrap_or(Duration::ZERO);
            if !pause.is_zero() {
                sleep(pause).await;
            }

            info!(
                "Processing room {}/{}: {} (ID: {})",
                index + 1,
                rooms.len(),
                room.name,
                room.id
            );
            let (result, rate_limit_backoff) = self.regenerate_code(room).await;
            backoff = rate_limit_backoff;
            results.push(result);
        }

        return results;
    }

    /// Lists rooms, regenerates every code, then writes the csv. Only listing
    /// and writing the csv can fail the run.
    pub async fn run(&self, output_file: &Path) -> Result<Vec<EnrollmentResult>> {
        let rooms = self.list_rooms().await?;
        if rooms.is_empty() {
            info!("no rooms found in the organization, nothing to export");
            return Ok(Vec::new());
        }

        let results = self.process_rooms(&rooms).await;
        results::export_to_csv(output_file, &results)?;
        info!(
            rows = results.len(),
            path = %output_file.display(),
            "csv export completed"
        );

        return Ok(results);
    }
}
