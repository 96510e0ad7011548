use crate::client::RestHelper;
use crate::error::Result;
use crate::locator::Locator;
use crate::types::{QueuedBuild, TriggerBuildRequest};

const TRIGGER_BUILD: &str = "Trigger Build";
const GET_QUEUED_BUILD: &str = "Get Queued Build";

/// Operations for querying and interacting with the server's build queue
///
/// Every call is a single round trip: no retries, no caching.
#[derive(Debug, Clone)]
pub struct QueueService {
    rest: RestHelper,
}

impl QueueService {
    pub(crate) fn new(rest: RestHelper) -> Self {
        Self { rest }
    }

    /// Put a build in the queue
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use teamcity_queue::{Credentials, TeamCityClient, TriggerBuildRequest};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = TeamCityClient::new("http://localhost:8111", Credentials::token("t0k3n"))?;
    /// let queued = client
    ///     .build_queue()
    ///     .trigger_build(&TriggerBuildRequest::new("Project_Build", None))
    ///     .await?;
    /// println!("Queued build {} ({})", queued.id, queued.state);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn trigger_build(&self, request: &TriggerBuildRequest) -> Result<QueuedBuild> {
        self.rest.post("", request, TRIGGER_BUILD).await
    }

    /// Fetch the current state of a queued build by its ID
    pub async fn get_queued_build(&self, build_id: &str) -> Result<QueuedBuild> {
        let locator = Locator::id(build_id);
        self.rest.get(locator.as_str(), GET_QUEUED_BUILD).await
    }
}

#[cfg(test)]
mod tests {
    use crate::{Credentials, Properties, TeamCityClient, TeamCityError, TriggerBuildRequest};
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> TeamCityClient {
        TeamCityClient::new(server.url(), Credentials::token("test-token")).unwrap()
    }

    #[tokio::test]
    async fn test_trigger_build_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/app/rest/buildQueue/")
            .match_header("content-type", "application/json")
            .match_body(Matcher::JsonString(r#"{"buildTypeId":"bt1"}"#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":42,"state":"queued"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let queued = client
            .build_queue()
            .trigger_build(&TriggerBuildRequest::new("bt1", None))
            .await
            .unwrap();

        assert_eq!(queued.id, 42);
        assert_eq!(queued.state, "queued");
        assert_eq!(queued.get_id(), "42");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_trigger_build_sends_branch_and_properties() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/app/rest/buildQueue/")
            .match_body(Matcher::PartialJsonString(
                r#"{"buildTypeId":"bt1","branchName":"dev","properties":{"count":1}}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"id":43,"buildTypeId":"bt1","state":"queued"}"#)
            .create_async()
            .await;

        let props: Properties = [("env.X", "y")].into_iter().collect();
        let request = TriggerBuildRequest::new("bt1", Some(props)).with_branch("dev");
        let queued = client_for(&server)
            .build_queue()
            .trigger_build(&request)
            .await
            .unwrap();
        assert_eq!(queued.build_type_id, "bt1");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_trigger_build_error_is_tagged() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/app/rest/buildQueue/")
            .with_status(400)
            .with_body("No build type with id 'missing'")
            .create_async()
            .await;

        let err = client_for(&server)
            .build_queue()
            .trigger_build(&TriggerBuildRequest::new("missing", None))
            .await
            .unwrap_err();

        match err {
            TeamCityError::Request {
                operation,
                status,
                body,
            } => {
                assert_eq!(operation, "Trigger Build");
                assert_eq!(status, 400);
                assert!(body.contains("missing"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_trigger_build_malformed_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/app/rest/buildQueue/")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server)
            .build_queue()
            .trigger_build(&TriggerBuildRequest::new("bt1", None))
            .await
            .unwrap_err();

        assert!(matches!(err, TeamCityError::Serialization { .. }));
        assert_eq!(err.operation(), Some("Trigger Build"));
    }

    #[tokio::test]
    async fn test_get_queued_build_uses_id_locator() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/app/rest/buildQueue/id:42")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_body(r#"{"id":42,"state":"queued"}"#)
            .create_async()
            .await;

        let queued = client_for(&server)
            .build_queue()
            .get_queued_build("42")
            .await
            .unwrap();

        assert_eq!(queued.id, 42);
        assert_eq!(queued.state, "queued");
        assert_eq!(queued.get_id(), "42");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_queued_build_malformed_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/app/rest/buildQueue/id:42")
            .with_status(200)
            .with_body(r#"{"id":"forty-two"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .build_queue()
            .get_queued_build("42")
            .await
            .unwrap_err();

        assert!(matches!(err, TeamCityError::Serialization { .. }));
        assert_eq!(err.operation(), Some("Get Queued Build"));
    }

    #[tokio::test]
    async fn test_get_queued_build_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/app/rest/buildQueue/id:7")
            .with_status(404)
            .with_body("Nothing is found by locator 'id:7'")
            .create_async()
            .await;

        let err = client_for(&server)
            .build_queue()
            .get_queued_build("7")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.operation(), Some("Get Queued Build"));
    }

    #[tokio::test]
    async fn test_get_queued_build_unauthorized() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/app/rest/buildQueue/id:1")
            .with_status(401)
            .create_async()
            .await;

        let err = client_for(&server)
            .build_queue()
            .get_queued_build("1")
            .await
            .unwrap_err();

        assert!(err.is_auth_error());
        assert_eq!(err.operation(), Some("Get Queued Build"));
    }
}
