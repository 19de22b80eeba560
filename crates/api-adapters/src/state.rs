//! Shared application state handed to every handler.

use services::accounts::AccountService;
use services::bulletins::BulletinService;
use services::directory::DirectoryService;
use services::media::UploadService;

/// State shared across all handler invocations.
#[derive(Clone)]
pub struct AppState {
    pub directory: DirectoryService,
    pub accounts: AccountService,
    pub bulletins: BulletinService,
    pub uploads: UploadService,
}
