use utoipa::OpenApi;

use imovel_core::models::{DeleteResponse, UploadResponse, UploadedImage, WebpDerivative};

use crate::error::ErrorBody;
use crate::request_log::RequestRecord;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Imovel Asset Service",
        description = "Validated image upload, WebP conversion, and deletion"
    ),
    paths(
        crate::handlers::upload::upload_images,
        crate::handlers::delete::delete_image,
        crate::handlers::logs::recent_requests,
    ),
    components(schemas(
        UploadResponse,
        UploadedImage,
        WebpDerivative,
        DeleteResponse,
        ErrorBody,
        RequestRecord,
    )),
    tags(
        (name = "upload", description = "Image upload and deletion"),
        (name = "admin", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;
