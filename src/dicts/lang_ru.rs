//! Russian labels for Megaplan values and fields.
//!
//! Each table maps a snake_case key (as produced by response normalization)
//! to the label Megaplan shows in its own interface.

/// A label table: `(key, label)` pairs.
pub type LabelTable = &'static [(&'static str, &'static str)];

/// Task folders.
pub const FOLDERS: LabelTable = &[
    ("incoming", "входящие"),
    ("responsible", "ответственный"),
    ("executor", "соисполнитель"),
    ("owner", "исходящие"),
    ("auditor", "аудируемые"),
    ("all", "все"),
];

/// Task statuses.
pub const TASK_STATUSES: LabelTable = &[
    ("actual", "актуальные"),
    ("inprocess", "в процессе"),
    ("new", "новые"),
    ("overdue", "просроченные"),
    ("done", "условно завершенные"),
    ("delayed", "отложенные"),
    ("completed", "завершенные"),
    ("failed", "проваленные"),
    ("any", "любые"),
];

/// Fields of a task card.
pub const TASK_FIELDS_FULL: LabelTable = &[
    ("id", "ID задачи"),
    ("name", "Название"),
    ("status", "Статус"),
    ("deadline", "Дедлайн"),
    ("owner", "Постановщик (сотрудник)"),
    ("responsible", "Ответственный (сотрудник)"),
    ("severity", "Важность"),
    ("super_task", "Надзадача"),
    ("project", "Проект"),
    ("favorite", "В избранном"),
    ("time_created", "Время создания"),
    ("time_updated", "Время последней модификации"),
    ("folders", "Список папок, в которые попадает задача"),
    ("tags", "Тэги, привязанные к задаче"),
    ("activity", "Дата и время последней активности по задаче"),
    ("actions", "Список доступных действий над задачей"),
    ("is_overdue", "Является ли задача просроченной"),
    ("comments_unread", "Количество непрочитанных комментариев"),
];

/// Short task field names used in list columns.
pub const TASK_FIELDS: LabelTable = &[
    ("id", "идентификатор"),
    ("name", "наименование"),
    ("activity", "активность"),
    ("deadline", "дата дедлайна"),
    ("responsible", "ответственный"),
    ("owner", "постановщик"),
    ("contractor", "заказчик"),
    ("start", "старт"),
    ("planned_finish", "плановый финиш"),
    ("planned_work", "запланировано"),
    ("actual_work", "отработано"),
    ("completed", "процент завершения"),
    ("bonus", "бонус"),
    ("fine", "штраф"),
    ("planned_time", "длительность"),
];

/// Fields of a project card.
pub const PROJECT_FIELDS_FULL: LabelTable = &[
    ("id", "ID проекта"),
    ("name", "Название"),
    ("status", "Статус"),
    ("deadline", "Дедлайн"),
    ("owner", "Владелец (сотрудник)"),
    ("responsible", "Менеджер (сотрудник)"),
    ("severity", "Важность"),
    ("super_project", "Надпроект"),
    ("favorite", "В избранном"),
    ("time_created", "Время создания"),
    ("time_updated", "Время последней модификации"),
    ("tags", "Тэги, привязанные к проекту"),
    ("start", "Старт проекта"),
    ("activity", "Дата и время последней активности по проекту"),
    ("actions", "Список допустимых действий над проектом"),
    ("is_overdue", "Является ли проект просроченным"),
];

/// Fields of an employee card.
pub const EMPLOYEE_FIELDS_FULL: LabelTable = &[
    ("id", "ID сотрудника"),
    ("name", "Полное имя"),
    ("last_name", "Фамилия"),
    ("first_name", "Имя"),
    ("middle_name", "Отчество"),
    ("position", "Должность"),
    ("department", "Отдел"),
    ("phones", "Телефоны"),
    ("email", "E-mail"),
    ("status", "Статус"),
    ("time_created", "Время создания"),
    ("fire_day", "Дата увольнения"),
    ("avatar", "Адрес аватара сотрудника"),
    ("login", "Логин сотрудника"),
];

/// Fields of a department.
pub const DEPARTMENT_FIELDS_FULL: LabelTable = &[
    ("id", "ID отдела"),
    ("name", "Название отдела"),
    ("head", "Начальник отдела"),
    ("employees", "Список сотрудников отдела"),
    ("employees_count", "Количество сотрудников в отделе"),
];

/// Fields of a todo list.
pub const TODOLIST_FIELDS_FULL: LabelTable = &[
    ("id", "Id списка дел"),
    ("name", "Название списка дел"),
    ("todo_count", "Количество незавершенных дел в списке"),
];

/// Fields of an event.
pub const EVENT_FIELDS_FULL: LabelTable = &[
    ("id", "Id события"),
    ("description", "Описание события"),
    ("name", "Название события"),
    ("time_created", "Дата и время создания"),
    ("start_time", "Начало события"),
    ("duration", "Продолжительность события"),
    ("is_personal", "Личное дело?"),
    ("event_category", "Категория события"),
    ("participants", "Список участников"),
    ("contractors", "Список контрагентов"),
    ("reminders", "Напоминания"),
    ("has_todo", "Имеет дела?"),
    ("has_communication", "Имеет коммуникации?"),
    ("todo_list_id", "Код списка дел, в котором находится событие"),
    ("position", "Порядковый номер события внутри списка дел"),
    ("owner", "Id пользователя, создавшего событие"),
    ("is_finished", "Является ли событие завершенным"),
    ("place", "Место события"),
    ("is_favorite", "Добавлено ли событие в избранное"),
    ("time_updated", "Время последней модификации события"),
    ("can_edit", "Можно ли редактировать событие"),
    ("is_overdue", "Просрочено ли событие"),
];

/// Fields of an event place.
pub const EVENT_PLACE_FIELDS_FULL: LabelTable = &[("id", "Id места"), ("name", "Название места")];

/// Fields of an event category.
pub const EVENT_CATEGORY_FIELDS_FULL: LabelTable =
    &[("id", "Id категории"), ("name", "Название категории")];

/// Fields of a comment.
pub const COMMENT_FIELDS_FULL: LabelTable = &[
    ("id", "ID комментария"),
    ("text", "Текст комментария"),
    (
        "work",
        "Кол-во потраченных минут, которое приплюсовано к комментируемому объекту (задаче или проекту)",
    ),
    ("work_date", "Дата, на которую списаны потраченные часы"),
    ("time_created", "Время создания"),
    ("author", "Автор комментария (сотрудник)"),
    ("avatar", "Адрес аватара автора"),
    ("attaches", "Файлы, прикрепленные к комментарию"),
    ("is_unread", "Является ли комментарий непрочитанным"),
    ("is_favorite", "Находится ли комментарий в избранном"),
];

/// Extra fields returned with comment lists.
pub const COMMENT_EXTRAS: LabelTable =
    &[("first_unread_comment", "ID первого непрочитанного комментария")];

/// Fields of a notification.
pub const NOTIFICATION_FIELDS: LabelTable = &[
    ("id", "ID уведомления"),
    ("subject", "Предмет уведомления"),
    ("content", "Содержимое уведомления"),
    ("time_created", "Время создания уведомления"),
];

/// Fields of a contractor card.
pub const CONTRACTOR_FIELDS_FULL: LabelTable = &[
    ("id", "Идентификатор клиента"),
    ("name", "Имя клиента"),
    ("birthday", "Дата рождения"),
    ("description", "Описание клиента"),
    ("email", "E-mail"),
    ("facebook", "Facebook"),
    ("jabber", "Jabber"),
    ("payers", "Список плательщиков"),
    ("person_type", "Тип клиента"),
    ("prefer_transport", "Предпочтительный способ связи"),
    ("promising_rate", "Перспективность"),
    ("responsibles", "Ответственные"),
    ("site", "Сайт"),
    ("time_created", "Время создания"),
    ("time_updated", "Время обновления"),
    ("twitter", "Twitter"),
    ("type", "Тип"),
];

/// Returns the label for `key` in `table`.
pub fn label(table: LabelTable, key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dicts::{Folder, TaskStatus};

    #[test]
    fn test_label_lookup() {
        assert_eq!(label(FOLDERS, "owner"), Some("исходящие"));
        assert_eq!(label(TASK_FIELDS_FULL, "time_created"), Some("Время создания"));
        assert_eq!(label(FOLDERS, "archive"), None);
    }

    #[test]
    fn test_every_folder_and_status_has_a_label() {
        for folder in Folder::ALL {
            assert!(label(FOLDERS, folder.as_str()).is_some(), "{folder}");
        }
        for status in TaskStatus::ALL {
            assert!(label(TASK_STATUSES, status.as_str()).is_some(), "{status}");
        }
    }
}
