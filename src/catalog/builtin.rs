//! Built-in descriptor table.
//!
//! One bilingual entry per Open API operation. Adding an operation means adding
//! one `ToolDescriptor` here; the registry checks it on load.

use super::descriptor::{AccessTokenKind, HttpMethod, ParamDef, ParamType, ToolDescriptor};
use serde_json::json;

const TENANT_ONLY: &[AccessTokenKind] = &[AccessTokenKind::Tenant];

fn user_id_type() -> ParamDef {
    ParamDef::new(
        "user_id_type",
        ParamType::optional(ParamType::one_of(&["open_id", "union_id", "user_id"])),
        "User ID type",
        "用户 ID 类型",
    )
}

fn department_id_type() -> ParamDef {
    ParamDef::new(
        "department_id_type",
        ParamType::optional(ParamType::one_of(&["department_id", "open_department_id"])),
        "Department ID type",
        "部门 ID 类型",
    )
}

fn page_size(default: i64) -> ParamDef {
    ParamDef::new("page_size", ParamType::Int, "Page size", "分页大小").with_default(json!(default))
}

fn page_token() -> ParamDef {
    ParamDef::new(
        "page_token",
        ParamType::optional(ParamType::String),
        "Page token returned by the previous call; empty for the first page",
        "分页标记，第一次请求不填，表示从头开始遍历",
    )
}

fn msg_type() -> ParamDef {
    ParamDef::new(
        "msg_type",
        ParamType::one_of(&[
            "text",
            "post",
            "image",
            "file",
            "audio",
            "media",
            "sticker",
            "interactive",
            "share_chat",
            "share_user",
        ]),
        "Message type",
        "消息类型",
    )
}

fn content() -> ParamDef {
    ParamDef::new(
        "content",
        ParamType::String,
        "Message content as a JSON string, shaped by msg_type",
        "消息内容，JSON 结构序列化后的字符串，格式取决于 msg_type",
    )
}

fn im() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "im.v1.message.create",
            HttpMethod::Post,
            "/open-apis/im/v1/messages",
            "Send a message to a user or a chat",
            "给指定用户或者会话发送消息",
        )
        .with_params(vec![ParamDef::new(
            "receive_id_type",
            ParamType::one_of(&["open_id", "union_id", "user_id", "email", "chat_id"]),
            "Type of receive_id",
            "消息接收者 ID 类型",
        )])
        .with_data(vec![
            ParamDef::new("receive_id", ParamType::String, "Receiver ID", "消息接收者的 ID"),
            msg_type(),
            content(),
            ParamDef::new(
                "uuid",
                ParamType::optional(ParamType::String),
                "Deduplication key, valid for one hour",
                "消息去重标识，一小时内有效",
            ),
        ]),
        ToolDescriptor::new(
            "im.v1.message.list",
            HttpMethod::Get,
            "/open-apis/im/v1/messages",
            "List the history messages of a chat or thread",
            "获取会话（包括单聊、群组）的历史消息",
        )
        .with_params(vec![
            ParamDef::new(
                "container_id_type",
                ParamType::one_of(&["chat", "thread"]),
                "Container type",
                "容器类型",
            ),
            ParamDef::new("container_id", ParamType::String, "Container ID", "容器 ID"),
            ParamDef::new(
                "start_time",
                ParamType::optional(ParamType::String),
                "Start time, seconds since epoch",
                "起始时间（秒级时间戳）",
            ),
            ParamDef::new(
                "end_time",
                ParamType::optional(ParamType::String),
                "End time, seconds since epoch",
                "结束时间（秒级时间戳）",
            ),
            ParamDef::new(
                "sort_type",
                ParamType::optional(ParamType::one_of(&["ByCreateTimeAsc", "ByCreateTimeDesc"])),
                "Sort order",
                "消息排序方式",
            ),
            page_size(20),
            page_token(),
        ]),
        ToolDescriptor::new(
            "im.v1.message.reply",
            HttpMethod::Post,
            "/open-apis/im/v1/messages/:message_id/reply",
            "Reply to a message",
            "回复指定消息",
        )
        .with_path(vec![ParamDef::new(
            "message_id",
            ParamType::String,
            "ID of the message to reply to",
            "待回复的消息 ID",
        )])
        .with_data(vec![
            content(),
            msg_type(),
            ParamDef::new(
                "reply_in_thread",
                ParamType::optional(ParamType::Bool),
                "Reply in thread form",
                "是否以话题形式回复",
            ),
        ]),
        ToolDescriptor::new(
            "im.v1.chat.create",
            HttpMethod::Post,
            "/open-apis/im/v1/chats",
            "Create a group chat",
            "创建群",
        )
        .with_params(vec![
            user_id_type(),
            ParamDef::new(
                "set_bot_manager",
                ParamType::optional(ParamType::Bool),
                "Make the creating bot a chat manager",
                "是否设置创建群的机器人为管理员",
            ),
        ])
        .with_data(vec![
            ParamDef::new("name", ParamType::optional(ParamType::String), "Chat name", "群名称"),
            ParamDef::new(
                "description",
                ParamType::optional(ParamType::String),
                "Chat description",
                "群描述",
            ),
            ParamDef::new(
                "owner_id",
                ParamType::optional(ParamType::String),
                "Owner ID, typed by user_id_type",
                "群主 ID，类型与 user_id_type 一致",
            ),
            ParamDef::new(
                "user_id_list",
                ParamType::optional(ParamType::StringList),
                "Initial members",
                "初始成员 ID 列表",
            ),
            ParamDef::new(
                "chat_type",
                ParamType::optional(ParamType::one_of(&["private", "public"])),
                "Chat type",
                "群类型",
            ),
        ]),
        ToolDescriptor::new(
            "im.v1.chat.list",
            HttpMethod::Get,
            "/open-apis/im/v1/chats",
            "List the chats the caller belongs to",
            "获取用户或机器人所在的群列表",
        )
        .with_params(vec![
            user_id_type(),
            ParamDef::new(
                "sort_type",
                ParamType::optional(ParamType::one_of(&["ByCreateTimeAsc", "ByActiveTimeDesc"])),
                "Sort order",
                "群组排序方式",
            ),
            page_token(),
            page_size(20),
        ]),
        ToolDescriptor::new(
            "im.v1.chatMembers.get",
            HttpMethod::Get,
            "/open-apis/im/v1/chats/:chat_id/members",
            "List the members of a chat",
            "获取群成员列表",
        )
        .with_path(vec![ParamDef::new("chat_id", ParamType::String, "Chat ID", "群 ID")])
        .with_params(vec![
            ParamDef::new(
                "member_id_type",
                ParamType::optional(ParamType::one_of(&["user_id", "union_id", "open_id"])),
                "Member ID type",
                "群成员用户 ID 类型",
            ),
            page_size(20),
            page_token(),
        ]),
    ]
}

fn contact() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "contact.v3.user.get",
            HttpMethod::Get,
            "/open-apis/contact/v3/users/:user_id",
            "Get one user's profile",
            "获取单个用户信息",
        )
        .with_path(vec![ParamDef::new(
            "user_id",
            ParamType::String,
            "User ID, typed by user_id_type",
            "用户 ID，类型与 user_id_type 一致",
        )])
        .with_params(vec![user_id_type(), department_id_type()]),
        ToolDescriptor::new(
            "contact.v3.user.batchGetId",
            HttpMethod::Post,
            "/open-apis/contact/v3/users/batch_get_id",
            "Look up user IDs by email or mobile number",
            "通过手机号或邮箱获取用户 ID",
        )
        .with_tokens(TENANT_ONLY)
        .with_params(vec![user_id_type()])
        .with_data(vec![
            ParamDef::new(
                "emails",
                ParamType::optional(ParamType::StringList),
                "Emails to look up, at most 50",
                "要查询的用户邮箱，最多 50 条",
            ),
            ParamDef::new(
                "mobiles",
                ParamType::optional(ParamType::StringList),
                "Mobile numbers to look up, at most 50",
                "要查询的用户手机号，最多 50 条",
            ),
            ParamDef::new(
                "include_resigned",
                ParamType::optional(ParamType::Bool),
                "Include resigned users",
                "查询结果是否包含离职员工",
            ),
        ]),
        ToolDescriptor::new(
            "contact.v3.department.children",
            HttpMethod::Get,
            "/open-apis/contact/v3/departments/:department_id/children",
            "List the child departments of a department",
            "获取子部门列表",
        )
        .with_path(vec![ParamDef::new(
            "department_id",
            ParamType::String,
            "Department ID; 0 for the root department",
            "部门 ID，根部门为 0",
        )])
        .with_params(vec![
            user_id_type(),
            department_id_type(),
            ParamDef::new(
                "fetch_child",
                ParamType::optional(ParamType::Bool),
                "Recurse into all descendants",
                "是否递归获取子部门",
            ),
            page_size(10),
            page_token(),
        ]),
    ]
}

fn helpdesk() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "helpdesk.v1.ticket.get",
            HttpMethod::Get,
            "/open-apis/helpdesk/v1/tickets/:ticket_id",
            "Get the details of a helpdesk ticket",
            "查询服务台工单详情",
        )
        .with_tokens(TENANT_ONLY)
        .with_path(vec![ParamDef::new("ticket_id", ParamType::String, "Ticket ID", "工单 ID")]),
        ToolDescriptor::new(
            "helpdesk.v1.faq.list",
            HttpMethod::Get,
            "/open-apis/helpdesk/v1/faqs",
            "List helpdesk FAQs",
            "获取服务台知识库列表",
        )
        .with_tokens(TENANT_ONLY)
        .with_params(vec![
            ParamDef::new(
                "category_id",
                ParamType::optional(ParamType::String),
                "FAQ category ID",
                "知识库分类 ID",
            ),
            ParamDef::new(
                "search",
                ParamType::optional(ParamType::String),
                "Search keyword",
                "搜索关键词",
            ),
            page_token(),
            page_size(20),
        ]),
    ]
}

fn mdm() -> Vec<ToolDescriptor> {
    vec![ToolDescriptor::new(
        "mdm.v1.userAuthDataRelation.bind",
        HttpMethod::Post,
        "/open-apis/mdm/v1/user_auth_data_relations/bind",
        "Grant users access to master data dimensions",
        "通过该接口为用户授权主数据维度的数据权限",
    )
    .with_tokens(TENANT_ONLY)
    .with_params(vec![user_id_type()])
    .with_data(vec![
        ParamDef::new(
            "root_dimension_type",
            ParamType::String,
            "Root dimension type",
            "数据类型编码",
        ),
        ParamDef::new(
            "sub_dimension_types",
            ParamType::StringList,
            "Dimension codes to grant",
            "数据编码列表",
        ),
        ParamDef::new(
            "authorized_user_ids",
            ParamType::StringList,
            "Users to authorize",
            "授权人员 ID 列表",
        ),
        ParamDef::new(
            "uams_app_id",
            ParamType::String,
            "Application ID in the authorization system",
            "权限系统中的应用 ID",
        ),
    ])]
}

fn trust_party() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "trust_party.v1.collaborationTenant.list",
            HttpMethod::Get,
            "/open-apis/trust_party/v1/collaboration_tenants",
            "List the partner tenants the caller's tenant collaborates with",
            "获取当前租户可见的关联组织列表",
        )
        .with_params(vec![page_token(), page_size(50)]),
        ToolDescriptor::new(
            "trust_party.v1.collaborationTenant.get",
            HttpMethod::Get,
            "/open-apis/trust_party/v1/collaboration_tenants/:target_tenant_key",
            "Get one partner tenant",
            "获取关联组织详情",
        )
        .with_path(vec![ParamDef::new(
            "target_tenant_key",
            ParamType::String,
            "Tenant key of the partner organization",
            "对方关联组织的租户 ID",
        )]),
    ]
}

fn cardkit() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "cardkit.v1.card.create",
            HttpMethod::Post,
            "/open-apis/cardkit/v1/cards",
            "Create a card entity from card JSON or a template",
            "基于卡片 JSON 代码或卡片模板创建卡片实体",
        )
        .with_data(vec![
            ParamDef::new(
                "type",
                ParamType::one_of(&["card_json", "template"]),
                "Card source type",
                "卡片类型",
            ),
            ParamDef::new(
                "data",
                ParamType::String,
                "Card JSON or template reference, serialized",
                "卡片数据，JSON 序列化后的字符串",
            ),
        ]),
        ToolDescriptor::new(
            "cardkit.v1.cardElement.content",
            HttpMethod::Put,
            "/open-apis/cardkit/v1/cards/:card_id/elements/:element_id/content",
            "Stream-update the text content of a card element",
            "流式更新卡片组件的文本内容",
        )
        .with_path(vec![
            ParamDef::new("card_id", ParamType::String, "Card entity ID", "卡片实体 ID"),
            ParamDef::new("element_id", ParamType::String, "Element ID", "组件 ID"),
        ])
        .with_data(vec![
            ParamDef::new(
                "uuid",
                ParamType::optional(ParamType::String),
                "Idempotency key",
                "幂等 ID",
            ),
            ParamDef::new("content", ParamType::String, "New text content", "更新后的文本内容"),
            ParamDef::new(
                "sequence",
                ParamType::Int,
                "Strictly increasing operation sequence",
                "操作卡片的序号，需严格递增",
            ),
        ]),
    ]
}

fn docx() -> Vec<ToolDescriptor> {
    vec![ToolDescriptor::new(
        "docx.v1.document.rawContent",
        HttpMethod::Get,
        "/open-apis/docx/v1/documents/:document_id/raw_content",
        "Get the plain-text content of a document",
        "获取文档的纯文本内容",
    )
    .with_path(vec![ParamDef::new(
        "document_id",
        ParamType::String,
        "Document ID",
        "文档唯一标识",
    )])
    .with_params(vec![ParamDef::new(
        "lang",
        ParamType::optional(ParamType::Int),
        "Language of @user names: 0 default, 1 English, 2 Japanese",
        "指定 @用户 的语言：0 默认名称，1 英文名称，2 日文名称",
    )])]
}

fn bitable() -> Vec<ToolDescriptor> {
    vec![ToolDescriptor::new(
        "bitable.v1.appTableRecord.search",
        HttpMethod::Post,
        "/open-apis/bitable/v1/apps/:app_token/tables/:table_id/records/search",
        "Search records in a base table",
        "查询多维表格数据表中的记录",
    )
    .with_path(vec![
        ParamDef::new("app_token", ParamType::String, "Base app token", "多维表格 App 的唯一标识"),
        ParamDef::new("table_id", ParamType::String, "Table ID", "数据表 ID"),
    ])
    .with_params(vec![user_id_type(), page_token(), page_size(20)])
    .with_data(vec![
        ParamDef::new(
            "view_id",
            ParamType::optional(ParamType::String),
            "View ID",
            "视图 ID",
        ),
        ParamDef::new(
            "field_names",
            ParamType::optional(ParamType::StringList),
            "Fields to return",
            "需要返回的字段名",
        ),
        ParamDef::new(
            "sort",
            ParamType::optional(ParamType::Object(vec![
                ParamDef::new("field_name", ParamType::String, "Sort field", "排序字段"),
                ParamDef::new(
                    "desc",
                    ParamType::optional(ParamType::Bool),
                    "Sort descending",
                    "是否倒序排序",
                ),
            ])),
            "Sort condition",
            "排序条件",
        ),
        ParamDef::new(
            "automatic_fields",
            ParamType::optional(ParamType::Bool),
            "Return created/modified time and user fields",
            "是否返回自动计算的字段",
        ),
    ])]
}

/// Every built-in descriptor, grouped by project.
pub fn descriptors() -> Vec<ToolDescriptor> {
    [im(), contact(), helpdesk(), mdm(), trust_party(), cardkit(), docx(), bitable()]
        .into_iter()
        .flatten()
        .collect()
}
