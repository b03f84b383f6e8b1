/// Redirect that sends the user to their provider to prove an identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRedirect {
    /// Provider URL, including the return target and its nonce
    pub url: String,
    /// Claimed identity the challenge was started for
    pub identity: String,
}
