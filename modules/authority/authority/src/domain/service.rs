//! Authentication flows: password login, refresh rotation, logout, token
//! validation and who-am-i.
//!
//! Login and refresh both resolve authority fresh from the membership data
//! and gate on it; nothing from an earlier token is trusted for that.

use std::sync::Arc;

use async_trait::async_trait;
use authority_sdk::{
    AuthenticationApi, AuthorityError, EffectiveAuthority, GrantType, LoginRequest, TokenResponse,
    TokenType, User, ValidateTokenResponse, ValidatedClaims, WhoAmIResponse,
};
use tessera_auth::{AuthorityGrant, TokenClaims, TokenIssuer, TokenKind, TokenValidator};
use tessera_security::OperatorMetadata;
use tracing::{debug, info, warn};

use crate::domain::error::DomainError;
use crate::domain::repo::{RoleReader, TokenStore, UserDirectory};
use crate::domain::resolver::{AuthorityResolver, check_gate};

/// Optional client and device identification carried into the tokens.
#[derive(Debug, Default)]
struct ClientInfo {
    client_id: Option<String>,
    device_id: Option<String>,
}

#[derive(Clone)]
pub struct AuthenticationService {
    users: Arc<dyn UserDirectory>,
    roles: Arc<dyn RoleReader>,
    tokens: Arc<dyn TokenStore>,
    resolver: AuthorityResolver,
    issuer: Arc<dyn TokenIssuer>,
    validator: Arc<dyn TokenValidator>,
}

impl AuthenticationService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserDirectory>,
        roles: Arc<dyn RoleReader>,
        tokens: Arc<dyn TokenStore>,
        resolver: AuthorityResolver,
        issuer: Arc<dyn TokenIssuer>,
        validator: Arc<dyn TokenValidator>,
    ) -> Self {
        Self {
            users,
            roles,
            tokens,
            resolver,
            issuer,
            validator,
        }
    }

    async fn password_login(&self, req: LoginRequest) -> Result<TokenResponse, AuthorityError> {
        let (Some(username), Some(password)) = (req.username.as_deref(), req.password.as_deref())
        else {
            return Err(AuthorityError::InvalidCredentials);
        };

        if !self.users.verify_credential(username, password).await? {
            debug!(username, "credential rejected");
            return Err(AuthorityError::InvalidCredentials);
        }

        let mut user = self.users.get_by_username(username).await?;
        let authority = self.resolver.resolve(&mut user).await?;
        info!(
            user_id = user.id,
            tenant_id = user.tenant_id,
            data_scope = %authority.data_scope,
            is_platform_admin = authority.is_platform_admin,
            is_tenant_admin = authority.is_tenant_admin,
            "password login resolved"
        );
        check_gate(&authority)?;

        let client = ClientInfo {
            client_id: req.client_id,
            device_id: req.device_id,
        };
        self.issue(&user, &authority, client).await
    }

    async fn refresh_login(&self, req: LoginRequest) -> Result<TokenResponse, AuthorityError> {
        let token = req
            .refresh_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AuthorityError::IncorrectRefreshToken)?;

        let claims = self
            .validator
            .validate_and_parse(token, TokenKind::Refresh)
            .await
            .map_err(|e| {
                debug!(error = %e, "refresh token rejected");
                AuthorityError::IncorrectRefreshToken
            })?;
        let user_id = claims
            .user_id()
            .map_err(|_| AuthorityError::IncorrectRefreshToken)?;

        // Revoked or rotated tokens stop here, before any lookup.
        let recorded = self
            .tokens
            .refresh_token_exists(user_id, token)
            .await
            .map_err(|e| token_store_failed(user_id, &e))?;
        if !recorded {
            debug!(user_id, "refresh token not recorded");
            return Err(AuthorityError::IncorrectRefreshToken);
        }

        let mut user = self.users.get_by_id(user_id).await?;
        let authority = self.resolver.resolve(&mut user).await?;
        info!(
            user_id,
            tenant_id = user.tenant_id,
            data_scope = %authority.data_scope,
            "refresh resolved"
        );
        if let Err(denied) = check_gate(&authority) {
            self.revoke_refresh_token(user_id, token).await;
            return Err(denied);
        }

        // Check and delete in one step; concurrent rotations of one token race here.
        let consumed = self
            .tokens
            .consume_refresh_token(user_id, token)
            .await
            .map_err(|e| token_store_failed(user_id, &e))?;
        if !consumed {
            debug!(user_id, "refresh token not recorded");
            return Err(AuthorityError::IncorrectRefreshToken);
        }

        match self.roles.list_role_codes_by_ids(&user.role_ids).await {
            Ok(codes) => user.roles = codes,
            Err(e) => warn!(user_id, error = %e, "role code lookup failed, keeping resolved roles"),
        }

        let client = ClientInfo {
            client_id: req.client_id.or_else(|| claims.client_id.clone()),
            device_id: req.device_id.or_else(|| claims.device_id.clone()),
        };
        self.issue(&user, &authority, client).await
    }

    /// Drop a refresh token whose holder no longer passes the gate.
    async fn revoke_refresh_token(&self, user_id: u32, token: &str) {
        match self.tokens.remove_refresh_token(user_id, token).await {
            Ok(removed) => info!(user_id, removed, "authority lost, refresh token revoked"),
            Err(e) => warn!(user_id, error = %e, "refresh token revocation failed"),
        }
    }

    /// Mint a pair for the resolved authority and record it.
    async fn issue(
        &self,
        user: &User,
        authority: &EffectiveAuthority,
        client: ClientInfo,
    ) -> Result<TokenResponse, AuthorityError> {
        let grant = AuthorityGrant {
            user_id: user.id,
            username: user.username.clone(),
            tenant_id: user.tenant_id,
            org_unit_id: authority.org_unit_id,
            data_scope: authority.data_scope,
            is_platform_admin: authority.is_platform_admin,
            is_tenant_admin: authority.is_tenant_admin,
            roles: user.roles.clone(),
            client_id: client.client_id,
            device_id: client.device_id,
        };

        let pair = self.issuer.issue_pair(&grant).await.map_err(|e| {
            warn!(user_id = user.id, error = %e, "token issuing failed");
            AuthorityError::service_unavailable("generate token failed")
        })?;

        let saved = async {
            self.tokens
                .save_access_token(user.id, &pair.access_token, pair.access_expires_at)
                .await?;
            self.tokens
                .save_refresh_token(user.id, &pair.refresh_token, pair.refresh_expires_at)
                .await?;
            Ok::<(), DomainError>(())
        };
        saved.await.map_err(|e| {
            warn!(user_id = user.id, error = %e, "token store failed");
            AuthorityError::service_unavailable("generate token failed")
        })?;

        Ok(TokenResponse {
            token_type: TokenType::Bearer,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }
}

fn token_store_failed(user_id: u32, e: &DomainError) -> AuthorityError {
    warn!(user_id, error = %e, "refresh token store failed");
    AuthorityError::service_unavailable(format!("token store failed: {e}"))
}

fn validated_claims(claims: TokenClaims) -> Option<ValidatedClaims> {
    let user_id = claims.user_id().ok()?;
    let expires_at = claims.expires_at().ok()?;
    Some(ValidatedClaims {
        user_id,
        username: claims.username,
        tenant_id: claims.tenant_id,
        org_unit_id: claims.org_unit_id,
        data_scope: claims.data_scope,
        is_platform_admin: claims.is_platform_admin,
        is_tenant_admin: claims.is_tenant_admin,
        roles: claims.roles,
        client_id: claims.client_id,
        device_id: claims.device_id,
        expires_at,
    })
}

#[async_trait]
impl AuthenticationApi for AuthenticationService {
    async fn login(&self, req: LoginRequest) -> Result<TokenResponse, AuthorityError> {
        debug!(grant_type = ?req.grant_type, "login");
        match req.grant_type {
            GrantType::Password => self.password_login(req).await,
            GrantType::RefreshToken => self.refresh_login(req).await,
            GrantType::ClientCredentials => Err(AuthorityError::InvalidGrantType),
        }
    }

    async fn refresh_token(&self, req: LoginRequest) -> Result<TokenResponse, AuthorityError> {
        if req.grant_type != GrantType::RefreshToken {
            return Err(AuthorityError::InvalidGrantType);
        }
        self.refresh_login(req).await
    }

    async fn logout(&self, operator: &OperatorMetadata) -> Result<(), AuthorityError> {
        self.tokens.remove_all(operator.user_id()).await?;
        info!(user_id = operator.user_id(), "logged out, all tokens revoked");
        Ok(())
    }

    async fn validate_token(&self, token: &str) -> Result<ValidateTokenResponse, AuthorityError> {
        let Ok(claims) = self.validator.validate_and_parse(token, TokenKind::Access).await else {
            return Ok(ValidateTokenResponse::invalid());
        };
        Ok(validated_claims(claims).map_or_else(ValidateTokenResponse::invalid, |claims| {
            ValidateTokenResponse {
                is_valid: true,
                claims: Some(claims),
            }
        }))
    }

    async fn who_am_i(
        &self,
        operator: &OperatorMetadata,
    ) -> Result<WhoAmIResponse, AuthorityError> {
        Ok(WhoAmIResponse {
            user_id: operator.user_id(),
            username: operator.username().to_owned(),
        })
    }
}
