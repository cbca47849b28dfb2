//! Share CRUD service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use securestore_auth::password::PasswordHasher;
use securestore_core::error::AppError;
use securestore_database::ShareStore;
use securestore_entity::share::{CreateShareLink, ShareLink};

use super::link::LinkService;
use crate::context::RequestContext;
use crate::file::{FileService, SweepReport};

/// Manages share creation, listing, and revocation.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Share link store.
    shares: Arc<dyn ShareStore>,
    /// File service, for ownership checks.
    files: Arc<FileService>,
    /// Token generator.
    links: LinkService,
    /// Password hasher for password-protected shares.
    hasher: Arc<PasswordHasher>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        files: Arc<FileService>,
        links: LinkService,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            shares,
            files,
            links,
            hasher,
        }
    }

    /// Creates a share link for one of the caller's files.
    ///
    /// An empty or absent password makes the link public.
    #[tracing::instrument(skip(self, ctx, password), fields(user_id = %ctx.user_id))]
    pub async fn create_share_link(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        ttl: Duration,
        password: Option<&str>,
    ) -> Result<ShareLink, AppError> {
        if ttl <= Duration::zero() {
            return Err(AppError::validation("Share link TTL must be positive"));
        }

        let file = self.files.get_file(ctx, file_id).await?;

        let password_hash = match password.filter(|p| !p.is_empty()) {
            Some(password) => Some(self.hasher.hash_password(password)?),
            None => None,
        };

        let link = self
            .shares
            .create(&CreateShareLink {
                file_id: file.id,
                share_token: self.links.generate_token(),
                expires_at: Utc::now() + ttl,
                password_hash,
                created_by: ctx.user_id,
            })
            .await?;

        info!(
            share_id = %link.id,
            file_id = %file.id,
            expires_at = %link.expires_at,
            protected = link.requires_password(),
            "Share link created"
        );

        Ok(link)
    }

    /// Lists the links on one of the caller's files.
    pub async fn list_links(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<Vec<ShareLink>, AppError> {
        let file = self.files.get_file(ctx, file_id).await?;
        self.shares.list_by_file(file.id).await
    }

    /// Deletes a link the caller created.
    #[tracing::instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn delete_link(&self, ctx: &RequestContext, link_id: Uuid) -> Result<(), AppError> {
        let link = self
            .shares
            .find_by_id(link_id)
            .await?
            .filter(|link| link.created_by == ctx.user_id)
            .ok_or_else(|| AppError::not_found("Share link not found"))?;

        if !self.shares.delete(link.id).await? {
            return Err(AppError::not_found("Share link not found"));
        }

        info!(share_id = %link.id, "Share link deleted");
        Ok(())
    }

    /// Removes every link whose expiry has passed.
    #[tracing::instrument(skip(self))]
    pub async fn cleanup_expired_shares(&self) -> Result<SweepReport, AppError> {
        let mut report = SweepReport::new("cleanup_expired_shares");
        let removed = self.shares.delete_expired(Utc::now()).await?;
        report.scanned = removed;
        report.purged = removed;

        info!(purged = removed, "Expired share links removed");
        Ok(report)
    }
}
