use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures::future::BoxFuture;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpStream, lookup_host},
    time::timeout,
};
use tracing::debug;

use crate::device::{
    DeviceError, DeviceResult, DeviceSnapshot, Hsv, NotificationDevice,
};

use super::{
    config::KasaConfig,
    models::{LIGHTING_SERVICE, LightingServiceResponse, SysInfoResponse, TransitionLightState},
    protocol::{HEADER_LEN, decode_body, encode_frame},
};

/// Responses larger than this are treated as corrupt rather than allocated.
const MAX_RESPONSE_LEN: usize = 64 * 1024;

/// TP-Link Kasa smart bulb reached over the local network.
#[derive(Clone)]
pub struct KasaBulb {
    address: SocketAddr,
    label: Arc<str>,
    command_timeout: Duration,
}

impl KasaBulb {
    /// Resolve the configured address. No command is sent until the first call.
    pub async fn connect(config: KasaConfig) -> DeviceResult<Self> {
        let label = config.socket_address();
        let address = lookup_host(label.as_str())
            .await
            .map_err(|source| DeviceError::Resolve {
                address: label.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| DeviceError::NoAddress {
                address: label.clone(),
            })?;

        Ok(Self {
            address,
            label: Arc::from(label),
            command_timeout: config.command_timeout,
        })
    }

    async fn send<Req, Resp>(&self, request: &Req) -> DeviceResult<Resp>
    where
        Req: ?Sized + Serialize,
        Resp: DeserializeOwned,
    {
        let payload =
            serde_json::to_vec(request).map_err(|source| DeviceError::Encode { source })?;

        let body = timeout(self.command_timeout, self.exchange(&payload))
            .await
            .map_err(|_| DeviceError::Timeout {
                address: self.label.to_string(),
            })?
            .map_err(|source| DeviceError::Io {
                address: self.label.to_string(),
                source,
            })?;

        let plain = decode_body(&body);
        debug!(device = %self.label, response = %String::from_utf8_lossy(&plain), "device response");

        serde_json::from_slice(&plain).map_err(|source| DeviceError::Decode {
            address: self.label.to_string(),
            source,
        })
    }

    async fn exchange(&self, payload: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut stream = TcpStream::connect(self.address).await?;
        stream.write_all(&encode_frame(payload)).await?;

        let mut header = [0u8; HEADER_LEN];
        stream.read_exact(&mut header).await?;
        let len = u32::from_be_bytes(header) as usize;
        if len > MAX_RESPONSE_LEN {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("response length {len} exceeds {MAX_RESPONSE_LEN} bytes"),
            ));
        }

        let mut body = vec![0u8; len];
        stream.read_exact(&mut body).await?;
        Ok(body)
    }

    async fn transition(&self, command: TransitionLightState) -> DeviceResult<()> {
        let request = json!({ LIGHTING_SERVICE: { "transition_light_state": command } });
        let response: LightingServiceResponse = self.send(&request).await?;
        response.service.transition_light_state.into_result()
    }
}

impl NotificationDevice for KasaBulb {
    fn capture_state(&self) -> BoxFuture<'static, DeviceResult<DeviceSnapshot>> {
        let bulb = self.clone();
        Box::pin(async move {
            let request = json!({ "system": { "get_sysinfo": {} } });
            let response: SysInfoResponse = bulb.send(&request).await?;
            response.system.get_sysinfo.into_snapshot()
        })
    }

    fn set_color(&self, color: Hsv, fade: Duration) -> BoxFuture<'static, DeviceResult<()>> {
        let bulb = self.clone();
        Box::pin(async move {
            let fade_ms = u64::try_from(fade.as_millis()).unwrap_or(u64::MAX);
            bulb.transition(TransitionLightState::color(color, fade_ms))
                .await
        })
    }

    fn restore_state(&self, snapshot: DeviceSnapshot) -> BoxFuture<'static, DeviceResult<()>> {
        let bulb = self.clone();
        Box::pin(async move { bulb.transition(TransitionLightState::restore(snapshot)).await })
    }
}
