// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resource service content (mocked in memory).

use crate::auth::Role;
use crate::models::{Post, PublicUser};

#[derive(Debug, Default)]
pub struct ResourceDirectory {
    users: Vec<PublicUser>,
    posts: Vec<Post>,
}

impl ResourceDirectory {
    pub fn new(users: Vec<PublicUser>, posts: Vec<Post>) -> Self {
        Self { users, posts }
    }

    pub fn seeded() -> Self {
        let user = |id, name: &str, email: &str, role| PublicUser {
            id,
            name: name.to_string(),
            email: email.to_string(),
            role,
        };
        let post = |id, title: &str, content: &str, user_id| Post {
            id,
            title: title.to_string(),
            content: content.to_string(),
            user_id,
        };

        Self::new(
            vec![
                user(1, "João Silva", "joao@example.com", Role::Admin),
                user(2, "Maria Santos", "maria@example.com", Role::User),
                user(3, "Pedro Costa", "pedro@example.com", Role::User),
            ],
            vec![
                post(1, "Welcome to our platform", "This is the first post", 1),
                post(2, "Getting started guide", "Learn how to use our services", 1),
                post(3, "My first experience", "Sharing my thoughts...", 2),
            ],
        )
    }

    pub fn list_users(&self) -> Vec<PublicUser> {
        self.users.clone()
    }

    pub fn list_posts(&self) -> Vec<Post> {
        self.posts.clone()
    }
}
