//! Listing parameters: `keyword_type`, `keyword`, `page`, `size` and a
//! repeatable `sort=field[,asc|desc]`.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use quill_core::DomainError;
use quill_core::query::{PageRequest, PostKeyword, Sort, SortField};

use crate::middleware::error::AppError;

#[derive(Debug, Default)]
pub struct ListParams {
    pairs: Vec<(String, String)>,
}

impl ListParams {
    pub fn parse(query: &str) -> Result<Self, AppError> {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(query)
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .into_inner();
        Ok(Self { pairs })
    }

    fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn number(&self, key: &str) -> Result<Option<u64>, DomainError> {
        self.first(key)
            .map(|raw| {
                raw.trim().parse().map_err(|_| {
                    DomainError::invalid(format!(
                        "{key} must be a non-negative integer, got '{raw}'"
                    ))
                })
            })
            .transpose()
    }

    fn sort_params(&self) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == "sort")
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn keyword(&self) -> Result<PostKeyword, DomainError> {
        PostKeyword::parse(self.first("keyword_type"), self.first("keyword"))
    }

    pub fn sort<F: SortField>(&self) -> Result<Sort<F>, DomainError> {
        Sort::parse(&self.sort_params())
    }

    pub fn page_request<F: SortField>(&self) -> Result<PageRequest<F>, DomainError> {
        PageRequest::parse(
            self.number("page")?,
            self.number("size")?,
            &self.sort_params(),
        )
    }
}

impl FromRequest for ListParams {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::parse(req.query_string()))
    }
}
