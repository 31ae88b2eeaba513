//! SQLite backend for podspace storage.
//!
//! IDs are stored as uuid strings, timestamps as unix seconds. Chat message
//! ids come from an AUTOINCREMENT column so they are monotonic in creation
//! order, which the unread-cursor comparison relies on.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use uuid::Uuid;

use podspace_storage::*;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub struct SqliteStore {
    pool: SqlitePool,
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Map UNIQUE-constraint violations to AlreadyExists, everything else to
/// Backend.
fn insert_err(e: sqlx::Error) -> StoreError {
    let s = e.to_string();
    if s.contains("UNIQUE") {
        StoreError::AlreadyExists
    } else {
        StoreError::Backend(s)
    }
}

fn parse_uuid(s: &str) -> Result<Uuid, StoreError> {
    Uuid::try_parse(s).map_err(|e| StoreError::Backend(e.to_string()))
}

fn from_ts(secs: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| StoreError::Backend(format!("invalid timestamp {secs}")))
}

type PodRow = (String, String, Option<String>, Option<String>, String, i64);

fn pod_from_row(r: PodRow) -> Result<Pod, StoreError> {
    Ok(Pod {
        id: PodId(parse_uuid(&r.0)?),
        name: r.1,
        tagline: r.2,
        logo_url: r.3,
        creator_id: UserId(parse_uuid(&r.4)?),
        created_at: from_ts(r.5)?,
    })
}

type BlockRow = (
    String,
    String,
    String,
    String,
    Option<String>,
    f64,
    f64,
    String,
    i64,
);

fn block_from_row(r: BlockRow) -> Result<Block, StoreError> {
    Ok(Block {
        id: BlockId(parse_uuid(&r.0)?),
        pod_id: PodId(parse_uuid(&r.1)?),
        block_type: r.2.parse().map_err(StoreError::Backend)?,
        label: r.3,
        description: r.4,
        x: r.5,
        y: r.6,
        creator_id: UserId(parse_uuid(&r.7)?),
        created_at: from_ts(r.8)?,
    })
}

type InvitationRow = (String, String, String, String, String, String, i64, i64);

fn invitation_from_row(r: InvitationRow) -> Result<Invitation, StoreError> {
    Ok(Invitation {
        id: InvitationId(parse_uuid(&r.0)?),
        pod_id: PodId(parse_uuid(&r.1)?),
        email: r.2,
        token: r.3,
        invited_by: UserId(parse_uuid(&r.4)?),
        status: r.5.parse().map_err(StoreError::Backend)?,
        expires_at: from_ts(r.6)?,
        created_at: from_ts(r.7)?,
    })
}

impl SqliteStore {
    /// `~/.podspace/store.db` (creates dir with 0700 perms on unix)
    pub async fn open_default() -> Result<Self, StoreError> {
        let dir = dirs::home_dir()
            .ok_or_else(|| StoreError::Backend("no home dir".into()))?
            .join(".podspace");
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Backend(e.to_string()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o700))
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        let path = dir.join("store.db");
        let url = format!("sqlite://{}?mode=rwc", path.to_string_lossy());
        Self::open(&url).await
    }

    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open("sqlite::memory:").await
    }

    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(backend)?;

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    // ───────────────────────────── Users ──────────────────────────────────

    async fn create_user(&self, params: &CreateUserParams) -> Result<UserId, StoreError> {
        let id = Uuid::now_v7();
        sqlx::query(
            "INSERT INTO users(id,email,password_hash,name,profile_picture,created_at)
             VALUES(?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(&params.email)
        .bind(&params.password_hash)
        .bind(&params.name)
        .bind(&params.profile_picture)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .map_err(insert_err)?;
        Ok(UserId(id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String, String, Option<String>, i64)>(
            "SELECT id,email,password_hash,name,profile_picture,created_at
             FROM users WHERE email=?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        Ok(User {
            id: UserId(parse_uuid(&row.0)?),
            email: row.1,
            password_hash: row.2,
            name: row.3,
            profile_picture: row.4,
            created_at: from_ts(row.5)?,
        })
    }

    async fn get_user_by_id(&self, user_id: &UserId) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String, String, Option<String>, i64)>(
            "SELECT id,email,password_hash,name,profile_picture,created_at
             FROM users WHERE id=?",
        )
        .bind(user_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        Ok(User {
            id: UserId(parse_uuid(&row.0)?),
            email: row.1,
            password_hash: row.2,
            name: row.3,
            profile_picture: row.4,
            created_at: from_ts(row.5)?,
        })
    }

    // ───────────────────────────── Sessions ───────────────────────────────

    async fn create_session(&self, user_id: &UserId, token: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO sessions(token,user_id,created_at) VALUES(?,?,?)")
            .bind(token)
            .bind(user_id.0.to_string())
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(insert_err)?;
        Ok(())
    }

    async fn get_session_user(&self, token: &str) -> Result<UserId, StoreError> {
        let row = sqlx::query_as::<_, (String,)>("SELECT user_id FROM sessions WHERE token=?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?
            .ok_or(StoreError::NotFound)?;
        Ok(UserId(parse_uuid(&row.0)?))
    }

    // ───────────────────────────── Pods ───────────────────────────────────

    async fn create_pod(&self, params: &CreatePodParams) -> Result<PodId, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp();
        let mut tx = self.pool.begin().await.map_err(backend)?;
        sqlx::query(
            "INSERT INTO pods(id,name,tagline,logo_url,creator_id,created_at)
             VALUES(?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(&params.name)
        .bind(&params.tagline)
        .bind(&params.logo_url)
        .bind(params.creator_id.0.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;
        // Creator membership is created atomically with the pod.
        sqlx::query("INSERT INTO pod_members(pod_id,user_id,role,joined_at) VALUES(?,?,?,?)")
            .bind(id.to_string())
            .bind(params.creator_id.0.to_string())
            .bind(PodRole::Creator.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        tx.commit().await.map_err(backend)?;
        Ok(PodId(id))
    }

    async fn get_pod(&self, pod_id: &PodId) -> Result<Pod, StoreError> {
        let row = sqlx::query_as::<_, PodRow>(
            "SELECT id,name,tagline,logo_url,creator_id,created_at FROM pods WHERE id=?",
        )
        .bind(pod_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        pod_from_row(row)
    }

    async fn update_pod(
        &self,
        pod_id: &PodId,
        name: Option<String>,
        tagline: Option<String>,
        logo_url: Option<String>,
    ) -> Result<(), StoreError> {
        let res = sqlx::query(
            "UPDATE pods SET name=COALESCE(?,name), tagline=COALESCE(?,tagline),
             logo_url=COALESCE(?,logo_url) WHERE id=?",
        )
        .bind(name)
        .bind(tagline)
        .bind(logo_url)
        .bind(pod_id.0.to_string())
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_pod(&self, pod_id: &PodId) -> Result<(), StoreError> {
        let pod = pod_id.0.to_string();
        let mut tx = self.pool.begin().await.map_err(backend)?;
        // Block-scoped rows first, selected through the pod's blocks, then
        // pod-scoped rows, then the pod itself. One transaction so the caller
        // never observes a deleted pod with addressable children.
        for sql in [
            "DELETE FROM read_cursors WHERE block_id IN (SELECT id FROM blocks WHERE pod_id=?)",
            "DELETE FROM chat_messages WHERE block_id IN (SELECT id FROM blocks WHERE pod_id=?)",
            "DELETE FROM documents WHERE block_id IN (SELECT id FROM blocks WHERE pod_id=?)",
            "DELETE FROM calendar_events WHERE block_id IN (SELECT id FROM blocks WHERE pod_id=?)",
            "DELETE FROM goals WHERE block_id IN (SELECT id FROM blocks WHERE pod_id=?)",
            "DELETE FROM block_members WHERE block_id IN (SELECT id FROM blocks WHERE pod_id=?)",
            "DELETE FROM blocks WHERE pod_id=?",
            "DELETE FROM pod_members WHERE pod_id=?",
            "DELETE FROM invitations WHERE pod_id=?",
        ] {
            sqlx::query(sql)
                .bind(&pod)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
        }
        let res = sqlx::query("DELETE FROM pods WHERE id=?")
            .bind(&pod)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        tx.commit().await.map_err(backend)?;
        Ok(())
    }

    async fn list_pods_for_user(&self, user_id: &UserId) -> Result<Vec<PodSummary>, StoreError> {
        let rows = sqlx::query_as::<
            _,
            (
                String,
                String,
                Option<String>,
                Option<String>,
                String,
                i64,
                String,
            ),
        >(
            "SELECT p.id,p.name,p.tagline,p.logo_url,p.creator_id,p.created_at,m.role
             FROM pods p JOIN pod_members m ON m.pod_id = p.id
             WHERE m.user_id=? ORDER BY p.created_at DESC",
        )
        .bind(user_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        let mut out = Vec::with_capacity(rows.len());
        for (id, name, tagline, logo_url, creator, created, role) in rows {
            out.push(PodSummary {
                pod: pod_from_row((id, name, tagline, logo_url, creator, created))?,
                role: role.parse().map_err(StoreError::Backend)?,
            });
        }
        Ok(out)
    }

    // ───────────────────────────── Pod members ────────────────────────────

    async fn get_pod_member(
        &self,
        pod_id: &PodId,
        user_id: &UserId,
    ) -> Result<PodMember, StoreError> {
        let row = sqlx::query_as::<_, (String, i64)>(
            "SELECT role,joined_at FROM pod_members WHERE pod_id=? AND user_id=?",
        )
        .bind(pod_id.0.to_string())
        .bind(user_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        Ok(PodMember {
            pod_id: pod_id.clone(),
            user_id: user_id.clone(),
            role: row.0.parse().map_err(StoreError::Backend)?,
            joined_at: from_ts(row.1)?,
        })
    }

    async fn add_pod_member(
        &self,
        pod_id: &PodId,
        user_id: &UserId,
        role: PodRole,
    ) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO pod_members(pod_id,user_id,role,joined_at) VALUES(?,?,?,?)")
            .bind(pod_id.0.to_string())
            .bind(user_id.0.to_string())
            .bind(role.as_str())
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(insert_err)?;
        Ok(())
    }

    async fn list_pod_members(&self, pod_id: &PodId) -> Result<Vec<PodMemberView>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String, String, Option<String>, String, i64)>(
            "SELECT u.id,u.name,u.email,u.profile_picture,m.role,m.joined_at
             FROM pod_members m JOIN users u ON u.id = m.user_id
             WHERE m.pod_id=? ORDER BY m.joined_at ASC",
        )
        .bind(pod_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        let mut out = Vec::with_capacity(rows.len());
        for (id, name, email, picture, role, joined) in rows {
            out.push(PodMemberView {
                user_id: UserId(parse_uuid(&id)?),
                name,
                email,
                profile_picture: picture,
                role: role.parse().map_err(StoreError::Backend)?,
                joined_at: from_ts(joined)?,
            });
        }
        Ok(out)
    }

    async fn count_pod_members(&self, pod_id: &PodId) -> Result<i64, StoreError> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM pod_members WHERE pod_id=?")
            .bind(pod_id.0.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(row.0)
    }

    // ───────────────────────────── Invitations ────────────────────────────

    async fn create_invitation(
        &self,
        params: &CreateInvitationParams,
    ) -> Result<Invitation, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO invitations(id,pod_id,email,token,invited_by,status,expires_at,created_at)
             VALUES(?,?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.pod_id.0.to_string())
        .bind(&params.email)
        .bind(&params.token)
        .bind(params.invited_by.0.to_string())
        .bind(InvitationStatus::Pending.as_str())
        .bind(params.expires_at.timestamp())
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .map_err(insert_err)?;
        self.get_invitation_by_token(&params.token).await
    }

    async fn get_invitation_by_token(&self, token: &str) -> Result<Invitation, StoreError> {
        let row = sqlx::query_as::<_, InvitationRow>(
            "SELECT id,pod_id,email,token,invited_by,status,expires_at,created_at
             FROM invitations WHERE token=?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        invitation_from_row(row)
    }

    async fn find_pending_invitation(
        &self,
        pod_id: &PodId,
        email: &str,
    ) -> Result<Option<Invitation>, StoreError> {
        let row = sqlx::query_as::<_, InvitationRow>(
            "SELECT id,pod_id,email,token,invited_by,status,expires_at,created_at
             FROM invitations WHERE pod_id=? AND email=? AND status='pending'",
        )
        .bind(pod_id.0.to_string())
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        row.map(invitation_from_row).transpose()
    }

    async fn mark_invitation_accepted(
        &self,
        invitation_id: &InvitationId,
    ) -> Result<(), StoreError> {
        let res = sqlx::query("UPDATE invitations SET status='accepted' WHERE id=?")
            .bind(invitation_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn redeem_invitation(
        &self,
        invitation_id: &InvitationId,
        pod_id: &PodId,
        user_id: &UserId,
    ) -> Result<(), StoreError> {
        // Membership insert and acceptance are one logical unit: no partial
        // membership-without-acceptance state may survive.
        let mut tx = self.pool.begin().await.map_err(backend)?;
        sqlx::query("INSERT INTO pod_members(pod_id,user_id,role,joined_at) VALUES(?,?,?,?)")
            .bind(pod_id.0.to_string())
            .bind(user_id.0.to_string())
            .bind(PodRole::Member.as_str())
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await
            .map_err(insert_err)?;
        let res = sqlx::query("UPDATE invitations SET status='accepted' WHERE id=?")
            .bind(invitation_id.0.to_string())
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        tx.commit().await.map_err(backend)?;
        Ok(())
    }

    // ───────────────────────────── Blocks ─────────────────────────────────

    async fn create_block(&self, params: &CreateBlockParams) -> Result<BlockId, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now().timestamp();
        let mut tx = self.pool.begin().await.map_err(backend)?;
        sqlx::query(
            "INSERT INTO blocks(id,pod_id,block_type,label,description,x,y,creator_id,created_at)
             VALUES(?,?,?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.pod_id.0.to_string())
        .bind(params.block_type.as_str())
        .bind(&params.label)
        .bind(&params.description)
        .bind(params.x)
        .bind(params.y)
        .bind(params.creator_id.0.to_string())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(backend)?;
        // Materialize the creator's membership so member listings include
        // them; the evaluator grants the creator access regardless.
        sqlx::query("INSERT INTO block_members(block_id,user_id,added_at) VALUES(?,?,?)")
            .bind(id.to_string())
            .bind(params.creator_id.0.to_string())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        tx.commit().await.map_err(backend)?;
        Ok(BlockId(id))
    }

    async fn get_block(&self, block_id: &BlockId) -> Result<Block, StoreError> {
        let row = sqlx::query_as::<_, BlockRow>(
            "SELECT id,pod_id,block_type,label,description,x,y,creator_id,created_at
             FROM blocks WHERE id=?",
        )
        .bind(block_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        block_from_row(row)
    }

    async fn list_blocks(&self, pod_id: &PodId) -> Result<Vec<Block>, StoreError> {
        let rows = sqlx::query_as::<_, BlockRow>(
            "SELECT id,pod_id,block_type,label,description,x,y,creator_id,created_at
             FROM blocks WHERE pod_id=? ORDER BY created_at DESC",
        )
        .bind(pod_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        rows.into_iter().map(block_from_row).collect()
    }

    async fn list_chat_blocks_for_pods(
        &self,
        pod_ids: &[PodId],
    ) -> Result<Vec<Block>, StoreError> {
        let mut out = Vec::new();
        for pod_id in pod_ids {
            let rows = sqlx::query_as::<_, BlockRow>(
                "SELECT id,pod_id,block_type,label,description,x,y,creator_id,created_at
                 FROM blocks WHERE pod_id=? AND block_type='chat' ORDER BY created_at ASC",
            )
            .bind(pod_id.0.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
            for row in rows {
                out.push(block_from_row(row)?);
            }
        }
        Ok(out)
    }

    async fn delete_block(&self, block_id: &BlockId) -> Result<(), StoreError> {
        let block = block_id.0.to_string();
        let mut tx = self.pool.begin().await.map_err(backend)?;
        for sql in [
            "DELETE FROM read_cursors WHERE block_id=?",
            "DELETE FROM chat_messages WHERE block_id=?",
            "DELETE FROM documents WHERE block_id=?",
            "DELETE FROM calendar_events WHERE block_id=?",
            "DELETE FROM goals WHERE block_id=?",
            "DELETE FROM block_members WHERE block_id=?",
        ] {
            sqlx::query(sql)
                .bind(&block)
                .execute(&mut *tx)
                .await
                .map_err(backend)?;
        }
        let res = sqlx::query("DELETE FROM blocks WHERE id=?")
            .bind(&block)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        tx.commit().await.map_err(backend)?;
        Ok(())
    }

    // ───────────────────────────── Block members ──────────────────────────

    async fn get_block_member(
        &self,
        block_id: &BlockId,
        user_id: &UserId,
    ) -> Result<BlockMember, StoreError> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT added_at FROM block_members WHERE block_id=? AND user_id=?",
        )
        .bind(block_id.0.to_string())
        .bind(user_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        Ok(BlockMember {
            block_id: block_id.clone(),
            user_id: user_id.clone(),
            added_at: from_ts(row.0)?,
        })
    }

    async fn add_block_member(
        &self,
        block_id: &BlockId,
        user_id: &UserId,
    ) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO block_members(block_id,user_id,added_at) VALUES(?,?,?)")
            .bind(block_id.0.to_string())
            .bind(user_id.0.to_string())
            .bind(Utc::now().timestamp())
            .execute(&self.pool)
            .await
            .map_err(insert_err)?;
        Ok(())
    }

    async fn list_block_members(
        &self,
        block_id: &BlockId,
    ) -> Result<Vec<BlockMemberView>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String, String, Option<String>, i64)>(
            "SELECT u.id,u.name,u.email,u.profile_picture,m.added_at
             FROM block_members m JOIN users u ON u.id = m.user_id
             WHERE m.block_id=? ORDER BY m.added_at ASC",
        )
        .bind(block_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        let mut out = Vec::with_capacity(rows.len());
        for (id, name, email, picture, added) in rows {
            out.push(BlockMemberView {
                user_id: UserId(parse_uuid(&id)?),
                name,
                email,
                profile_picture: picture,
                added_at: from_ts(added)?,
            });
        }
        Ok(out)
    }

    // ───────────────────────────── Chat messages ──────────────────────────

    async fn create_message(
        &self,
        block_id: &BlockId,
        user_id: &UserId,
        body: &str,
    ) -> Result<ChatMessage, StoreError> {
        let now = Utc::now();
        let res = sqlx::query(
            "INSERT INTO chat_messages(block_id,user_id,body,created_at) VALUES(?,?,?,?)",
        )
        .bind(block_id.0.to_string())
        .bind(user_id.0.to_string())
        .bind(body)
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(ChatMessage {
            id: MessageId(res.last_insert_rowid()),
            block_id: block_id.clone(),
            user_id: user_id.clone(),
            body: body.to_string(),
            created_at: from_ts(now.timestamp())?,
        })
    }

    async fn get_message(&self, message_id: &MessageId) -> Result<ChatMessage, StoreError> {
        let row = sqlx::query_as::<_, (i64, String, String, String, i64)>(
            "SELECT id,block_id,user_id,body,created_at FROM chat_messages WHERE id=?",
        )
        .bind(message_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        Ok(ChatMessage {
            id: MessageId(row.0),
            block_id: BlockId(parse_uuid(&row.1)?),
            user_id: UserId(parse_uuid(&row.2)?),
            body: row.3,
            created_at: from_ts(row.4)?,
        })
    }

    async fn list_messages(&self, block_id: &BlockId) -> Result<Vec<ChatMessageView>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, String, String, String, Option<String>, String, i64)>(
            "SELECT c.id,u.id,u.name,u.email,u.profile_picture,c.body,c.created_at
             FROM chat_messages c JOIN users u ON u.id = c.user_id
             WHERE c.block_id=? ORDER BY c.id ASC",
        )
        .bind(block_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        let mut out = Vec::with_capacity(rows.len());
        for (id, user_id, name, email, picture, body, created) in rows {
            out.push(ChatMessageView {
                id: MessageId(id),
                user_id: UserId(parse_uuid(&user_id)?),
                user_name: name,
                user_email: email,
                user_profile_picture: picture,
                body,
                created_at: from_ts(created)?,
            });
        }
        Ok(out)
    }

    async fn delete_message(&self, message_id: &MessageId) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM chat_messages WHERE id=?")
            .bind(message_id.0)
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn latest_message_id(
        &self,
        block_id: &BlockId,
    ) -> Result<Option<MessageId>, StoreError> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM chat_messages WHERE block_id=? ORDER BY id DESC LIMIT 1",
        )
        .bind(block_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(row.map(|(id,)| MessageId(id)))
    }

    async fn count_messages_after(
        &self,
        block_id: &BlockId,
        after: Option<MessageId>,
        exclude_author: &UserId,
    ) -> Result<i64, StoreError> {
        let row = sqlx::query_as::<_, (i64,)>(
            "SELECT COUNT(*) FROM chat_messages
             WHERE block_id=? AND user_id<>? AND id > COALESCE(?, -1)",
        )
        .bind(block_id.0.to_string())
        .bind(exclude_author.0.to_string())
        .bind(after.map(|m| m.0))
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;
        Ok(row.0)
    }

    // ───────────────────────────── Read cursors ───────────────────────────

    async fn get_read_cursor(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
    ) -> Result<Option<ReadCursor>, StoreError> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            "SELECT last_read_message_id,last_read_at FROM read_cursors
             WHERE user_id=? AND block_id=?",
        )
        .bind(user_id.0.to_string())
        .bind(block_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        match row {
            None => Ok(None),
            Some((message_id, read_at)) => Ok(Some(ReadCursor {
                user_id: user_id.clone(),
                block_id: block_id.clone(),
                last_read_message_id: MessageId(message_id),
                last_read_at: from_ts(read_at)?,
            })),
        }
    }

    async fn upsert_read_cursor(
        &self,
        user_id: &UserId,
        block_id: &BlockId,
        message_id: MessageId,
        read_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        // Last write wins; single-row atomicity comes from the unique index.
        sqlx::query(
            "INSERT INTO read_cursors(user_id,block_id,last_read_message_id,last_read_at)
             VALUES(?,?,?,?)
             ON CONFLICT(user_id,block_id) DO UPDATE SET
               last_read_message_id=excluded.last_read_message_id,
               last_read_at=excluded.last_read_at",
        )
        .bind(user_id.0.to_string())
        .bind(block_id.0.to_string())
        .bind(message_id.0)
        .bind(read_at.timestamp())
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    // ───────────────────────────── Documents ──────────────────────────────

    async fn create_document(
        &self,
        params: &CreateDocumentParams,
    ) -> Result<DocumentMeta, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO documents(id,block_id,file_name,file_type,file_size,uploaded_by,uploaded_at)
             VALUES(?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.block_id.0.to_string())
        .bind(&params.file_name)
        .bind(&params.file_type)
        .bind(params.file_size)
        .bind(params.uploaded_by.0.to_string())
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(DocumentMeta {
            id: DocumentId(id),
            block_id: params.block_id.clone(),
            file_name: params.file_name.clone(),
            file_type: params.file_type.clone(),
            file_size: params.file_size,
            uploaded_by: params.uploaded_by.clone(),
            uploaded_at: from_ts(now.timestamp())?,
        })
    }

    async fn get_document(&self, document_id: &DocumentId) -> Result<DocumentMeta, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String, String, i64, String, i64)>(
            "SELECT id,block_id,file_name,file_type,file_size,uploaded_by,uploaded_at
             FROM documents WHERE id=?",
        )
        .bind(document_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        Ok(DocumentMeta {
            id: DocumentId(parse_uuid(&row.0)?),
            block_id: BlockId(parse_uuid(&row.1)?),
            file_name: row.2,
            file_type: row.3,
            file_size: row.4,
            uploaded_by: UserId(parse_uuid(&row.5)?),
            uploaded_at: from_ts(row.6)?,
        })
    }

    async fn list_documents(&self, block_id: &BlockId) -> Result<Vec<DocumentMeta>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String, String, String, i64, String, i64)>(
            "SELECT id,block_id,file_name,file_type,file_size,uploaded_by,uploaded_at
             FROM documents WHERE block_id=? ORDER BY uploaded_at DESC",
        )
        .bind(block_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(DocumentMeta {
                id: DocumentId(parse_uuid(&row.0)?),
                block_id: BlockId(parse_uuid(&row.1)?),
                file_name: row.2,
                file_type: row.3,
                file_size: row.4,
                uploaded_by: UserId(parse_uuid(&row.5)?),
                uploaded_at: from_ts(row.6)?,
            });
        }
        Ok(out)
    }

    async fn delete_document(&self, document_id: &DocumentId) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM documents WHERE id=?")
            .bind(document_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ───────────────────────────── Calendar events ────────────────────────

    async fn create_event(&self, params: &CreateEventParams) -> Result<CalendarEvent, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO calendar_events(id,block_id,title,date,time,description,created_by,created_at)
             VALUES(?,?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.block_id.0.to_string())
        .bind(&params.title)
        .bind(params.date.timestamp())
        .bind(&params.time)
        .bind(&params.description)
        .bind(params.created_by.0.to_string())
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(CalendarEvent {
            id: EventId(id),
            block_id: params.block_id.clone(),
            title: params.title.clone(),
            date: params.date,
            time: params.time.clone(),
            description: params.description.clone(),
            created_by: params.created_by.clone(),
            created_at: from_ts(now.timestamp())?,
        })
    }

    async fn get_event(&self, event_id: &EventId) -> Result<CalendarEvent, StoreError> {
        let row = sqlx::query_as::<
            _,
            (
                String,
                String,
                String,
                i64,
                Option<String>,
                Option<String>,
                String,
                i64,
            ),
        >(
            "SELECT id,block_id,title,date,time,description,created_by,created_at
             FROM calendar_events WHERE id=?",
        )
        .bind(event_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        Ok(CalendarEvent {
            id: EventId(parse_uuid(&row.0)?),
            block_id: BlockId(parse_uuid(&row.1)?),
            title: row.2,
            date: from_ts(row.3)?,
            time: row.4,
            description: row.5,
            created_by: UserId(parse_uuid(&row.6)?),
            created_at: from_ts(row.7)?,
        })
    }

    async fn list_events(&self, block_id: &BlockId) -> Result<Vec<CalendarEvent>, StoreError> {
        let rows = sqlx::query_as::<
            _,
            (
                String,
                String,
                String,
                i64,
                Option<String>,
                Option<String>,
                String,
                i64,
            ),
        >(
            "SELECT id,block_id,title,date,time,description,created_by,created_at
             FROM calendar_events WHERE block_id=? ORDER BY date ASC",
        )
        .bind(block_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(CalendarEvent {
                id: EventId(parse_uuid(&row.0)?),
                block_id: BlockId(parse_uuid(&row.1)?),
                title: row.2,
                date: from_ts(row.3)?,
                time: row.4,
                description: row.5,
                created_by: UserId(parse_uuid(&row.6)?),
                created_at: from_ts(row.7)?,
            });
        }
        Ok(out)
    }

    async fn delete_event(&self, event_id: &EventId) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM calendar_events WHERE id=?")
            .bind(event_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    // ───────────────────────────── Goals ──────────────────────────────────

    async fn create_goal(&self, params: &CreateGoalParams) -> Result<Goal, StoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO goals(id,block_id,title,status,due_date,created_by,created_at)
             VALUES(?,?,?,?,?,?,?)",
        )
        .bind(id.to_string())
        .bind(params.block_id.0.to_string())
        .bind(&params.title)
        .bind(params.status.as_str())
        .bind(params.due_date.map(|d| d.timestamp()))
        .bind(params.created_by.0.to_string())
        .bind(now.timestamp())
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(Goal {
            id: GoalId(id),
            block_id: params.block_id.clone(),
            title: params.title.clone(),
            status: params.status,
            due_date: params.due_date,
            created_by: params.created_by.clone(),
            created_at: from_ts(now.timestamp())?,
        })
    }

    async fn get_goal(&self, goal_id: &GoalId) -> Result<Goal, StoreError> {
        let row = sqlx::query_as::<_, (String, String, String, String, Option<i64>, String, i64)>(
            "SELECT id,block_id,title,status,due_date,created_by,created_at
             FROM goals WHERE id=?",
        )
        .bind(goal_id.0.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?;
        Ok(Goal {
            id: GoalId(parse_uuid(&row.0)?),
            block_id: BlockId(parse_uuid(&row.1)?),
            title: row.2,
            status: row.3.parse().map_err(StoreError::Backend)?,
            due_date: row.4.map(from_ts).transpose()?,
            created_by: UserId(parse_uuid(&row.5)?),
            created_at: from_ts(row.6)?,
        })
    }

    async fn list_goals(&self, block_id: &BlockId) -> Result<Vec<Goal>, StoreError> {
        let rows = sqlx::query_as::<_, (String, String, String, String, Option<i64>, String, i64)>(
            "SELECT id,block_id,title,status,due_date,created_by,created_at
             FROM goals WHERE block_id=? ORDER BY created_at DESC",
        )
        .bind(block_id.0.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(Goal {
                id: GoalId(parse_uuid(&row.0)?),
                block_id: BlockId(parse_uuid(&row.1)?),
                title: row.2,
                status: row.3.parse().map_err(StoreError::Backend)?,
                due_date: row.4.map(from_ts).transpose()?,
                created_by: UserId(parse_uuid(&row.5)?),
                created_at: from_ts(row.6)?,
            });
        }
        Ok(out)
    }

    async fn update_goal(
        &self,
        goal_id: &GoalId,
        params: &UpdateGoalParams,
    ) -> Result<(), StoreError> {
        let current = self.get_goal(goal_id).await?;
        let title = params.title.clone().unwrap_or(current.title);
        let status = params.status.unwrap_or(current.status);
        let due_date = match params.due_date {
            Some(d) => d,
            None => current.due_date,
        };
        let res = sqlx::query("UPDATE goals SET title=?, status=?, due_date=? WHERE id=?")
            .bind(&title)
            .bind(status.as_str())
            .bind(due_date.map(|d| d.timestamp()))
            .bind(goal_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_goal(&self, goal_id: &GoalId) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM goals WHERE id=?")
            .bind(goal_id.0.to_string())
            .execute(&self.pool)
            .await
            .map_err(backend)?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
