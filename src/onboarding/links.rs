use async_trait::async_trait;
use open;
use tokio::task::spawn_blocking;

use crate::device::permission::Platform;
use crate::error::LinkOpenError;
use crate::onboarding::capabilities::LinkOpener;
use crate::onboarding::types::SettingsTarget;

pub async fn open_link(url: &str) -> Result<(), LinkOpenError> {
    let link = url.to_string();
    if !link.starts_with("http://") && !link.starts_with("https://") {
        return Err(LinkOpenError::NotHttp);
    }

    spawn_blocking(move || {
        open::that(&link)
    }).await??;

    Ok(())
}

/// Opens links with whatever the operating system registered for them.
///
/// Android settings pages are intent actions rather than URIs, so an Android host passes its
/// own [`LinkOpener`] that starts the intent.
pub struct SystemLinkOpener {
    platform: Platform,
}

impl SystemLinkOpener {
    pub fn new(platform: Platform) -> Self {
        SystemLinkOpener { platform }
    }
}

#[async_trait]
impl LinkOpener for SystemLinkOpener {
    async fn open_url(&self, url: &str) -> Result<(), LinkOpenError> {
        open_link(url).await
    }

    async fn open_settings(&self, target: SettingsTarget) -> Result<(), LinkOpenError> {
        let uri = match self.platform {
            Platform::Android { .. } => None,
            platform => target.uri(platform),
        };
        let uri = uri.ok_or_else(|| LinkOpenError::NoSettingsSurface {
            target: format!("{:?}", target),
        })?;

        spawn_blocking(move || {
            open::that(uri)
        }).await??;

        Ok(())
    }
}
