pub trait Configuration: Clone + Send + Sync + 'static {
    fn provider_key(&self) -> String;
    fn port(&self) -> String;
    fn database_url(&self) -> Option<String>;
}
