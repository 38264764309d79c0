use unseat_client::DeviceClient;

use crate::host::SessionHost;

/// One-shot workflow: list the active devices, require zero or one, disconnect
/// the one if present, hand the secret to the clipboard and close the host.
///
/// More than one active device violates the workflow's precondition; the
/// error is left for the caller to surface, nothing is disconnected.
pub(crate) async fn run_session(
    client: &DeviceClient,
    host: &mut dyn SessionHost,
    secret: &str,
) -> anyhow::Result<()> {
    let devices = client.fetch_active_devices().await?;
    if devices.len() > 1 {
        anyhow::bail!(
            "expected at most one active device, found {}",
            devices.len()
        );
    }
    if let Some(device) = devices.first() {
        client.disconnect_device(device.id).await?;
    }
    host.copy(secret)?;
    host.close();
    client.dispose();
    Ok(())
}
