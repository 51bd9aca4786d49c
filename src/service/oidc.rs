//! OpenID Connect provider client.
//!
//! Provider metadata is discovered once at startup from the issuer's
//! well-known document, together with the JWKS used to verify ID tokens.
//! The authorization-code flow itself is delegated to the oauth2 crate;
//! ID-token verification is done with jsonwebtoken against the discovered
//! key set.

use jsonwebtoken::{decode, decode_header, jwk::JwkSet, DecodingKey, Validation};
use oauth2::{
    basic::{
        BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
        BasicTokenType,
    },
    reqwest::async_http_client,
    url::Url,
    AuthUrl, AuthorizationCode, Client, ClientId, ClientSecret, CsrfToken, ExtraTokenFields,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, StandardRevocableToken,
    StandardTokenResponse, TokenResponse, TokenUrl,
};
use rand::{distr::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

use crate::{
    config::OidcConfig,
    error::{auth::AuthError, Error},
    model::auth::UserClaims,
};

/// Length of the generated nonce.
const NONCE_LEN: usize = 32;

/// Relevant fields of the provider's discovery document.
#[derive(Clone, Debug, Deserialize)]
pub struct ProviderMetadata {
    /// Issuer identifier; must match the `iss` claim of ID tokens.
    pub issuer: String,
    /// Authorization endpoint users are redirected to at login.
    pub authorization_endpoint: String,
    /// Token endpoint used for the code exchange.
    pub token_endpoint: String,
    /// Where the provider publishes its signing keys.
    pub jwks_uri: String,
    /// RP-initiated logout endpoint, when the provider offers one.
    #[serde(default)]
    pub end_session_endpoint: Option<String>,
}

/// Extra token-endpoint response fields beyond plain OAuth2.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IdTokenFields {
    /// The signed ID token. Required for a completed login, but optional in
    /// the wire format so a malformed provider response surfaces as an
    /// application error instead of a deserialization failure.
    #[serde(default)]
    pub id_token: Option<String>,
}

impl ExtraTokenFields for IdTokenFields {}

/// Token-endpoint response including the ID token.
pub type OidcTokenResponse = StandardTokenResponse<IdTokenFields, BasicTokenType>;

type OAuthClient = Client<
    BasicErrorResponse,
    OidcTokenResponse,
    BasicTokenType,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
>;

/// Everything needed to send a user to the provider and finish the flow
/// when they come back.
#[derive(Clone, Debug)]
pub struct LoginRequest {
    /// Authorization URL to redirect the user to.
    pub url: String,
    /// Anti-forgery state parameter embedded in the URL.
    pub state: String,
    /// Nonce expected back inside the ID token.
    pub nonce: String,
    /// PKCE verifier for the eventual code exchange.
    pub pkce_verifier: String,
}

/// Result of a successful authorization-code exchange.
#[derive(Clone, Debug)]
pub struct TokenSet {
    /// Access token issued by the provider.
    pub access_token: String,
    /// Access-token lifetime, when the provider reported one.
    pub expires_in: Option<std::time::Duration>,
    /// Signed ID token, when the provider returned one.
    pub id_token: Option<String>,
}

/// OIDC provider client built from discovered metadata.
pub struct OidcProvider {
    metadata: ProviderMetadata,
    jwks: JwkSet,
    client: OAuthClient,
    client_id: String,
}

impl OidcProvider {
    /// Discover provider metadata and signing keys, then build the client.
    ///
    /// Two HTTP round-trips at startup: the well-known configuration
    /// document and the JWKS it points at. The caller's client carries the
    /// outbound request timeout.
    pub async fn discover(oidc: &OidcConfig, http: &reqwest::Client) -> Result<Self, Error> {
        let well_known = format!(
            "{}/.well-known/openid-configuration",
            oidc.issuer_url.trim_end_matches('/')
        );

        let metadata: ProviderMetadata = http
            .get(&well_known)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let jwks: JwkSet = http
            .get(&metadata.jwks_uri)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Self::from_parts(metadata, jwks, oidc)
    }

    /// Build the client from already-fetched metadata and keys.
    pub fn from_parts(
        metadata: ProviderMetadata,
        jwks: JwkSet,
        oidc: &OidcConfig,
    ) -> Result<Self, Error> {
        let client = OAuthClient::new(
            ClientId::new(oidc.client_id.clone()),
            Some(ClientSecret::new(oidc.client_secret.clone())),
            AuthUrl::new(metadata.authorization_endpoint.clone())?,
            Some(TokenUrl::new(metadata.token_endpoint.clone())?),
        )
        .set_redirect_uri(RedirectUrl::new(oidc.redirect_uri())?);

        Ok(Self {
            metadata,
            jwks,
            client,
            client_id: oidc.client_id.clone(),
        })
    }

    /// Build an authorization request for the configured scopes.
    ///
    /// Generates a fresh state, nonce, and PKCE pair per call; the caller is
    /// responsible for persisting them in the session until the callback.
    pub fn login_request(&self, scopes: &[String]) -> LoginRequest {
        let nonce: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let mut request = self.client.authorize_url(CsrfToken::new_random);
        for scope in scopes {
            request = request.add_scope(Scope::new(scope.clone()));
        }

        let (url, state) = request
            .add_extra_param("nonce", nonce.as_str())
            .set_pkce_challenge(pkce_challenge)
            .url();

        LoginRequest {
            url: url.to_string(),
            state: state.secret().clone(),
            nonce,
            pkce_verifier: pkce_verifier.secret().clone(),
        }
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: String,
        pkce_verifier: String,
    ) -> Result<TokenSet, Error> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        Ok(TokenSet {
            access_token: token.access_token().secret().clone(),
            expires_in: token.expires_in(),
            id_token: token.extra_fields().id_token.clone(),
        })
    }

    /// Verify an ID token against the provider's key set and this flow's
    /// nonce, returning the claims on success.
    pub fn verify_id_token(
        &self,
        id_token: &str,
        expected_nonce: &str,
    ) -> Result<UserClaims, Error> {
        let header =
            decode_header(id_token).map_err(|e| AuthError::IdToken(e.to_string()))?;

        let jwk = match header.kid.as_deref() {
            Some(kid) => self.jwks.find(kid),
            None => self.jwks.keys.first(),
        }
        .ok_or_else(|| AuthError::IdToken("no matching key in provider JWKS".to_string()))?;

        let key =
            DecodingKey::from_jwk(jwk).map_err(|e| AuthError::IdToken(e.to_string()))?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[self.client_id.as_str()]);
        validation.set_issuer(&[self.metadata.issuer.as_str()]);

        let data = decode::<UserClaims>(id_token, &key, &validation)
            .map_err(|e| AuthError::IdToken(e.to_string()))?;

        if data.claims.nonce.as_deref() != Some(expected_nonce) {
            return Err(AuthError::IdToken("nonce mismatch".to_string()).into());
        }

        Ok(data.claims)
    }

    /// RP-initiated logout URL at the provider, when one is advertised.
    pub fn end_session_url(&self, post_logout_redirect: &str) -> Result<Option<String>, Error> {
        match &self.metadata.end_session_endpoint {
            Some(endpoint) => {
                let mut url = Url::parse(endpoint)?;
                url.query_pairs_mut()
                    .append_pair("post_logout_redirect_uri", post_logout_redirect);
                Ok(Some(url.to_string()))
            }
            None => Ok(None),
        }
    }
}
