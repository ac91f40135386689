use form_answer::{Team, User};

pub const ENGINEERING: i64 = 1;

pub fn engineering() -> Team {
    Team {
        id: ENGINEERING,
        name: "Engineering".to_string(),
    }
}

fn member(id: i64, name: &str, email: &str, role: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: Some(email.to_string()),
        role: Some(role.to_string()),
        team: Some(engineering()),
    }
}

pub fn ana() -> User {
    member(1, "Ana Lima", "ana@example.com", "MANAGER")
}

pub fn bruno() -> User {
    member(2, "Bruno Costa", "bruno@example.com", "USER")
}

pub fn caio() -> User {
    member(3, "Caio Reis", "caio@example.com", "USER")
}

pub fn dora() -> User {
    member(4, "Dora Alves", "dora@example.com", "USER")
}
