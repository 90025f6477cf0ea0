use azure_api_client::azure::request::RestRequest;
use azure_api_client::azure::serviceclient::ServiceClient;
use azure_api_client::json;

#[tokio::main]
async fn main() {
    let mut client = match ServiceClient::from_env() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let request = RestRequest::new("subscriptions").api_version("2022-09-01");
    if let Some(result) = client.call_rest(&request).await {
        json::print_pretty(&result.into_value());
    }
}
